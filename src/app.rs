use crate::domain::{
    deadline_from_date, sort_by_deadline, BlockedApp, CommonBlockableApp, Goal, OnboardingStep,
    ProductiveLife, UiMode, User, YearProgress,
};
use crate::notifications::{schedule_all, LocalScheduler, NotificationScheduler};
use crate::persistence::{
    load_settings, save_settings, schedule_file, settings_file, widget_file, GoalStore, JsonStore,
    Settings, StoreError, WidgetSync,
};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Number of fields in the goal form
const FORM_FIELDS: usize = 4;

/// Input form state for adding or editing a goal
#[derive(Debug, Clone, Default)]
pub struct GoalFormState {
    pub name: String,
    pub deadline: String, // YYYY-MM-DD
    pub why: String,
    pub regret: String,
    pub editing_field: usize, // 0 = name, 1 = deadline, 2 = why, 3 = regret
    pub editing_goal_id: Option<Uuid>,
}

impl GoalFormState {
    fn from_goal(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            deadline: goal
                .deadline
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            why: goal.why_it_matters.clone().unwrap_or_default(),
            regret: goal.what_youll_regret.clone().unwrap_or_default(),
            editing_field: 0,
            editing_goal_id: Some(goal.id),
        }
    }

    fn current_field_mut(&mut self) -> Option<&mut String> {
        match self.editing_field {
            0 => Some(&mut self.name),
            1 => Some(&mut self.deadline),
            2 => Some(&mut self.why),
            3 => Some(&mut self.regret),
            _ => None,
        }
    }
}

/// Parse a form deadline such as "2025-06-30"
pub fn parse_deadline(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Main application state
pub struct AppState {
    store: Box<dyn GoalStore>,
    scheduler: Box<dyn NotificationScheduler>,
    widget: WidgetSync,
    settings_path: PathBuf,
    pub settings: Settings,
    pub user: User,
    pub goals: Vec<Goal>,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub onboarding: Option<OnboardingStep>,
    pub input_form: Option<GoalFormState>,
    pub years_input: String,
    pub error_message: Option<String>,
    pub now: DateTime<Local>,

    // Animation frame counter for the critical-urgency pulse (increments every tick)
    pub animation_frame: u32,
}

impl AppState {
    /// Build the state around injected collaborators and resolve the local user.
    ///
    /// Unreadable settings or user records do not stop the app: defaults are
    /// used for this session and the problem is left in `error_message`.
    pub fn new(
        mut store: Box<dyn GoalStore>,
        scheduler: Box<dyn NotificationScheduler>,
        widget: WidgetSync,
        settings_path: PathBuf,
    ) -> Result<Self> {
        let mut problems = Vec::new();

        let (mut settings, settings_loaded) = match load_settings(&settings_path) {
            Ok(settings) => (settings, true),
            Err(e) => {
                log::warn!("Using default settings: {:#}", e);
                problems.push(format!("Failed to load settings: {:#}", e));
                (Settings::default(), false)
            }
        };

        let user = match Self::resolve_user(store.as_mut(), &mut settings) {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Using a session-only user: {:#}", e);
                problems.push(format!("Failed to load user: {}", e));
                let apple_id = settings
                    .user_apple_id
                    .clone()
                    .unwrap_or_else(|| format!("local-{}", Uuid::new_v4()));
                User::new(apple_id, settings.productive_years())
            }
        };

        // A settings file that failed to parse is left as it is
        if settings_loaded {
            if let Err(e) = save_settings(&settings_path, &settings) {
                log::warn!("Failed to save settings: {:#}", e);
                problems.push(format!("Failed to save settings: {:#}", e));
            }
        }

        Ok(Self {
            store,
            scheduler,
            widget,
            settings_path,
            settings,
            user,
            goals: Vec::new(),
            selected_index: 0,
            ui_mode: UiMode::Normal,
            onboarding: None,
            input_form: None,
            years_input: String::new(),
            error_message: if problems.is_empty() {
                None
            } else {
                Some(problems.join("; "))
            },
            now: Local::now(),
            animation_frame: 0,
        })
    }

    /// Open the JSON-backed state stored in `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        let scheduler = LocalScheduler::load_or_empty(schedule_file(dir));
        Self::new(
            Box::new(JsonStore::new(dir)),
            Box::new(scheduler),
            WidgetSync::new(widget_file(dir)),
            settings_file(dir),
        )
    }

    /// Find the user recorded in settings, creating one on first run
    fn resolve_user(store: &mut dyn GoalStore, settings: &mut Settings) -> Result<User, StoreError> {
        if let Some(apple_id) = &settings.user_apple_id {
            if let Some(user) = store.get_user_by_apple_id(apple_id)? {
                return Ok(user);
            }
        }

        let apple_id = settings
            .user_apple_id
            .clone()
            .unwrap_or_else(|| format!("local-{}", Uuid::new_v4()));
        let user = User::new(apple_id.clone(), settings.productive_years());
        store.create_user(&user)?;
        settings.user_apple_id = Some(apple_id);
        log::info!("Created local user {}", user.id);
        Ok(user)
    }

    pub fn productive_life(&self) -> ProductiveLife {
        self.settings.productive_life()
    }

    pub fn year_progress(&self) -> YearProgress {
        YearProgress::at(&self.now)
    }

    /// Get the currently selected goal
    pub fn selected_goal(&self) -> Option<&Goal> {
        self.goals.get(self.selected_index)
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.goals.len() {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.goals.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.goals.len() {
            self.selected_index = self.goals.len() - 1;
        }
    }

    /// Reload goals for the current user, nearest deadline first
    pub fn load_goals(&mut self) {
        match self.store.list_goals(self.user.id) {
            Ok(goals) => {
                self.goals = goals;
                self.clamp_selection();
                self.refresh_reminders();
            }
            Err(e) => self.report_error("Failed to load goals", &e),
        }
    }

    /// Persist a new goal and insert it in deadline order
    pub fn create_goal(&mut self, goal: Goal) {
        match self.store.create_goal(&goal) {
            Ok(()) => {
                self.goals.push(goal);
                sort_by_deadline(&mut self.goals);
                self.refresh_reminders();
            }
            Err(e) => self.report_error("Failed to create goal", &e),
        }
    }

    /// Persist edits and replace the goal in place
    pub fn update_goal(&mut self, goal: Goal) {
        match self.store.update_goal(&goal) {
            Ok(()) => {
                if let Some(slot) = self.goals.iter_mut().find(|g| g.id == goal.id) {
                    *slot = goal;
                }
            }
            Err(e) => self.report_error("Failed to update goal", &e),
        }
    }

    pub fn delete_goal(&mut self, id: Uuid) {
        match self.store.delete_goal(id) {
            Ok(()) => {
                self.goals.retain(|g| g.id != id);
                self.clamp_selection();
                self.refresh_reminders();
            }
            Err(e) => self.report_error("Failed to delete goal", &e),
        }
    }

    fn report_error(&mut self, context: &str, error: &StoreError) {
        log::warn!("{}: {}", context, error);
        self.error_message = Some(format!("{}: {}", context, error));
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Rebuild the daily reminders and the widget snapshot from the goal list
    pub fn refresh_reminders(&mut self) {
        if let Err(e) = self.reschedule_notifications() {
            log::warn!("Failed to schedule reminders: {:#}", e);
        }
        if let Err(e) = self.widget.sync_goals(&self.goals) {
            log::warn!("Failed to sync widget: {:#}", e);
        }
    }

    pub fn reschedule_notifications(&mut self) -> Result<()> {
        let life = self.productive_life();
        schedule_all(
            self.scheduler.as_mut(),
            &self.goals,
            life,
            &self.now,
            &mut rand::thread_rng(),
        )
    }

    /// Fire reminders that are due as of `now`
    pub fn deliver_reminders(&mut self) -> usize {
        match self.scheduler.deliver_due(&self.now) {
            Ok(fired) => {
                if fired > 0 {
                    log::info!("Delivered {} reminders", fired);
                }
                fired
            }
            Err(e) => {
                log::warn!("Failed to deliver reminders: {:#}", e);
                0
            }
        }
    }

    /// Refresh the clock; every view is recomputed from `now` on render
    pub fn tick(&mut self) {
        self.now = Local::now();

        // Increment animation frame counter (wraps at u32::MAX)
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Whether a pulsing row should currently be drawn highlighted
    pub fn pulse_on(&self) -> bool {
        self.animation_frame % 2 == 0
    }

    pub fn complete_onboarding(&mut self) -> Result<()> {
        self.settings.has_completed_onboarding = true;
        save_settings(&self.settings_path, &self.settings)
    }

    /// Return to the first-run state; goals are dropped from memory only
    pub fn reset_onboarding(&mut self) -> Result<()> {
        self.settings.has_completed_onboarding = false;
        self.goals.clear();
        self.selected_index = 0;
        save_settings(&self.settings_path, &self.settings)
    }

    /// Begin the first-run walkthrough
    pub fn start_onboarding(&mut self) {
        self.onboarding = Some(OnboardingStep::Welcome);
        self.ui_mode = UiMode::Onboarding;
    }

    /// Clear the onboarding flag and walk through first run again
    pub fn restart_onboarding(&mut self) {
        if let Err(e) = self.reset_onboarding() {
            log::warn!("Failed to reset onboarding: {:#}", e);
            self.error_message = Some(format!("Failed to reset onboarding: {:#}", e));
        }
        self.start_onboarding();
    }

    /// Move to the next onboarding step. The years editor and goal form
    /// are the regular ones, opened on top of the walkthrough.
    pub fn advance_onboarding(&mut self) {
        match self.onboarding {
            Some(OnboardingStep::Welcome) => self.onboarding = Some(OnboardingStep::YearContext),
            Some(OnboardingStep::YearContext) | Some(OnboardingStep::ProductiveYears) => {
                self.onboarding = Some(OnboardingStep::ProductiveYears);
                self.start_edit_years();
            }
            Some(OnboardingStep::FirstGoal) => self.start_add_goal(),
            Some(OnboardingStep::CountdownBegins { .. }) => self.finish_onboarding(),
            None => {}
        }
    }

    pub fn onboarding_back(&mut self) {
        self.onboarding = match self.onboarding {
            Some(OnboardingStep::YearContext) => Some(OnboardingStep::Welcome),
            Some(OnboardingStep::ProductiveYears) => Some(OnboardingStep::YearContext),
            Some(OnboardingStep::FirstGoal) => Some(OnboardingStep::ProductiveYears),
            other => other,
        };
    }

    /// The goal created during onboarding, once it exists
    pub fn onboarding_goal(&self) -> Option<&Goal> {
        match self.onboarding {
            Some(OnboardingStep::CountdownBegins { goal_id }) => self.goals.iter().find(|g| g.id == goal_id),
            _ => None,
        }
    }

    fn finish_onboarding(&mut self) {
        self.onboarding = None;
        self.ui_mode = UiMode::Normal;
        if let Err(e) = self.complete_onboarding() {
            log::warn!("Failed to save onboarding: {:#}", e);
            self.error_message = Some(format!("Failed to save onboarding: {:#}", e));
        }
        // Goals dropped by a reset come back alongside the new one
        self.load_goals();
    }

    /// Mode to return to when a form or modal closes
    fn resting_mode(&self) -> UiMode {
        if self.onboarding.is_some() {
            UiMode::Onboarding
        } else {
            UiMode::Normal
        }
    }

    /// Record the user's remaining productive years; zero restores the default
    pub fn set_productive_years(&mut self, years: u32) -> Result<()> {
        let years = ProductiveLife::new(years).years;
        self.settings.productive_years_remaining = years;
        save_settings(&self.settings_path, &self.settings)?;

        self.user.productive_years_remaining = years;
        self.store.update_user(&self.user)?;
        Ok(())
    }

    /// Start adding a new goal (opens input form)
    pub fn start_add_goal(&mut self) {
        self.input_form = Some(GoalFormState::default());
        self.ui_mode = UiMode::AddingGoal;
    }

    /// Start editing the selected goal (form prefilled)
    pub fn start_edit_goal(&mut self) {
        if let Some(goal) = self.selected_goal() {
            self.input_form = Some(GoalFormState::from_goal(goal));
            self.ui_mode = UiMode::EditingGoal;
        }
    }

    /// Cycle through form fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % FORM_FIELDS;
        }
    }

    /// Add character to input form (current field)
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(field) = self.input_form.as_mut().and_then(|f| f.current_field_mut()) {
            field.push(c);
        }
    }

    /// Backspace in input form (current field)
    pub fn input_form_backspace(&mut self) {
        if let Some(field) = self.input_form.as_mut().and_then(|f| f.current_field_mut()) {
            field.pop();
        }
    }

    /// Submit the form. Invalid input keeps the form open with an error.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };
        self.error_message = None;

        if form.name.trim().is_empty() {
            self.error_message = Some("Goal name cannot be empty".to_string());
            return;
        }
        let Some(date) = parse_deadline(&form.deadline) else {
            self.error_message = Some("Invalid deadline. Use YYYY-MM-DD".to_string());
            return;
        };
        let deadline = deadline_from_date(date);
        let mut created = None;

        match form.editing_goal_id {
            Some(id) => {
                let Some(mut goal) = self.goals.iter().find(|g| g.id == id).cloned() else {
                    self.cancel_input_form();
                    return;
                };
                goal.name = form.name.trim().to_string();
                goal.reschedule(deadline);
                goal = goal.with_why(form.why).with_regret(form.regret);
                self.update_goal(goal);
            }
            None => {
                let goal = Goal::new(self.user.id, form.name.trim().to_string(), deadline)
                    .with_why(form.why)
                    .with_regret(form.regret);
                created = Some(goal.id);
                self.create_goal(goal);
            }
        }

        if self.error_message.is_some() {
            return;
        }
        self.input_form = None;
        self.ui_mode = UiMode::Normal;

        if let (Some(OnboardingStep::FirstGoal), Some(goal_id)) = (self.onboarding, created) {
            self.onboarding = Some(OnboardingStep::CountdownBegins { goal_id });
            self.ui_mode = UiMode::Onboarding;
        }
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = self.resting_mode();
    }

    /// Ask for confirmation before deleting the selected goal
    pub fn start_delete_goal(&mut self) {
        if self.selected_goal().is_some() {
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.selected_goal().map(|g| g.id) {
            self.delete_goal(id);
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.ui_mode = UiMode::Normal;
    }

    pub fn start_edit_years(&mut self) {
        self.years_input = self.settings.productive_years().to_string();
        self.ui_mode = UiMode::EditingYears;
    }

    pub fn years_input_add_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.years_input.len() < 3 {
            self.years_input.push(c);
        }
    }

    pub fn years_input_backspace(&mut self) {
        self.years_input.pop();
    }

    pub fn submit_years(&mut self) {
        let years = self.years_input.parse::<u32>().unwrap_or(0);
        if let Err(e) = self.set_productive_years(years) {
            self.error_message = Some(format!("Failed to save productive years: {:#}", e));
        }
        self.years_input.clear();

        if self.onboarding == Some(OnboardingStep::ProductiveYears) {
            self.onboarding = Some(OnboardingStep::FirstGoal);
            self.start_add_goal();
        } else {
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn cancel_edit_years(&mut self) {
        self.years_input.clear();
        self.ui_mode = self.resting_mode();
    }

    pub fn blocked_apps(&self) -> Result<Vec<BlockedApp>, StoreError> {
        self.store.list_blocked_apps(self.user.id)
    }

    /// Block an app by catalogue name, or by an explicit bundle id
    pub fn block_app(&mut self, name: &str, bundle_id: Option<&str>) -> Result<BlockedApp, StoreError> {
        let bundle_id = match (bundle_id, CommonBlockableApp::find(name)) {
            (Some(id), _) => id.to_string(),
            (None, Some(known)) => known.bundle_id.to_string(),
            (None, None) => {
                return Err(StoreError::InvalidRecord(format!(
                    "Unknown app '{}', pass a bundle id",
                    name
                )))
            }
        };
        let app = BlockedApp::new(self.user.id, bundle_id, name.to_string());
        self.store.create_blocked_app(&app)?;
        Ok(app)
    }

    pub fn toggle_blocked_app(&mut self, id: Uuid) -> Result<BlockedApp, StoreError> {
        let mut app = self
            .blocked_apps()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound { kind: "Blocked app", id })?;
        app.toggle();
        self.store.update_blocked_app(&app)?;
        Ok(app)
    }

    pub fn unblock_app(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.store.delete_blocked_app(id)
    }
}
