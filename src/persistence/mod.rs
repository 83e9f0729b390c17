pub mod files;
pub mod settings;
pub mod store;
pub mod widget;

pub use files::{
    atomic_write, ensure_finite_dir, init_local_finite, read_file, report_file,
    schedule_file, settings_file, widget_file,
};
pub use settings::{load_settings, save_settings, Settings};
pub use store::{GoalStore, JsonStore, StoreError};
pub use widget::{WidgetEntry, WidgetSync};
