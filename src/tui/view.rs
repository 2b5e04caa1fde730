use crate::store::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Tasks,
    Projects,
    ProjectDetail,
}

impl Screen {
    /// Screens reachable from the tab bar, in tab order.
    pub const TABS: [Screen; 3] = [Screen::Home, Screen::Tasks, Screen::Projects];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Tasks => "Tasks",
            Screen::Projects => "Projects",
            Screen::ProjectDetail => "Project",
        }
    }

    /// Index of the highlighted tab. The detail screen lives under Projects.
    pub fn tab_index(self) -> usize {
        match self {
            Screen::Home => 0,
            Screen::Tasks => 1,
            Screen::Projects | Screen::ProjectDetail => 2,
        }
    }
}

/// Data work a transition asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Re-fetch tasks, scoped to a project or unscoped.
    FetchTasks(Option<String>),
}

/// Which screen is showing and which project is selected.
///
/// Transitions return an [`Effect`] instead of touching the store, and mark
/// the state dirty so the render loop knows to redraw.
#[derive(Debug)]
pub struct ViewState {
    screen: Screen,
    selected: Option<Project>,
    dirty: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            screen: Screen::Home,
            selected: None,
            dirty: true,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected.as_ref()
    }

    /// Project id new tasks and task fetches are scoped to.
    pub fn scope(&self) -> Option<&str> {
        self.selected.as_ref().map(|p| p.id.as_str())
    }

    /// Go to one of the tab screens. Leaving the detail screen drops the
    /// selection and brings back the unscoped task list.
    pub fn navigate(&mut self, screen: Screen) -> Effect {
        if screen == Screen::ProjectDetail || screen == self.screen {
            return Effect::None;
        }
        self.dirty = true;
        let left_detail = self.screen == Screen::ProjectDetail;
        self.screen = screen;
        if left_detail {
            self.selected = None;
            Effect::FetchTasks(None)
        } else {
            Effect::None
        }
    }

    /// Enter the detail screen for `project`, scoping tasks to it.
    pub fn open_project(&mut self, project: Project) -> Effect {
        let id = project.id.clone();
        self.selected = Some(project);
        self.screen = Screen::ProjectDetail;
        self.dirty = true;
        Effect::FetchTasks(Some(id))
    }

    pub fn back_to_projects(&mut self) -> Effect {
        if self.screen == Screen::ProjectDetail {
            self.navigate(Screen::Projects)
        } else {
            Effect::None
        }
    }

    /// Called before a project delete is sent, whatever its outcome. If the
    /// project is the selected one the view falls back to home.
    pub fn project_deleted(&mut self, project_id: &str) -> Effect {
        if self.scope() != Some(project_id) {
            return Effect::None;
        }
        self.selected = None;
        self.screen = Screen::Home;
        self.dirty = true;
        Effect::FetchTasks(None)
    }

    /// Keep the selected project's fields in sync after a re-fetch.
    pub fn sync_selected(&mut self, projects: &[Project]) {
        if let Some(selected) = self.selected.as_mut()
            && let Some(fresh) = projects.iter().find(|p| p.id == selected.id)
            && fresh != selected
        {
            *selected = fresh.clone();
            self.dirty = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str) -> Project {
        Project {
            id: id.into(),
            name: format!("project {id}"),
            description: None,
            color: "#a855f7".into(),
            created_at: None,
        }
    }

    #[test]
    fn starts_home_without_selection() {
        let mut view = ViewState::new();
        assert_eq!(view.screen(), Screen::Home);
        assert!(view.selected_project().is_none());
        assert!(view.take_dirty());
        assert!(!view.take_dirty());
    }

    #[test]
    fn tab_navigation_has_no_effect() {
        let mut view = ViewState::new();
        assert_eq!(view.navigate(Screen::Tasks), Effect::None);
        assert_eq!(view.screen(), Screen::Tasks);
        assert_eq!(view.navigate(Screen::Projects), Effect::None);
        assert_eq!(view.screen(), Screen::Projects);
    }

    #[test]
    fn cannot_navigate_to_detail_without_project() {
        let mut view = ViewState::new();
        view.take_dirty();
        assert_eq!(view.navigate(Screen::ProjectDetail), Effect::None);
        assert_eq!(view.screen(), Screen::Home);
        assert!(!view.take_dirty());
    }

    #[test]
    fn opening_project_scopes_tasks() {
        let mut view = ViewState::new();
        view.navigate(Screen::Projects);
        let effect = view.open_project(project("p1"));
        assert_eq!(effect, Effect::FetchTasks(Some("p1".into())));
        assert_eq!(view.screen(), Screen::ProjectDetail);
        assert_eq!(view.scope(), Some("p1"));
    }

    #[test]
    fn back_clears_selection_and_unscopes() {
        let mut view = ViewState::new();
        view.open_project(project("p1"));
        assert_eq!(view.back_to_projects(), Effect::FetchTasks(None));
        assert_eq!(view.screen(), Screen::Projects);
        assert!(view.scope().is_none());
        assert_eq!(view.back_to_projects(), Effect::None);
    }

    #[test]
    fn leaving_detail_by_tab_clears_selection() {
        let mut view = ViewState::new();
        view.open_project(project("p1"));
        assert_eq!(view.navigate(Screen::Tasks), Effect::FetchTasks(None));
        assert!(view.selected_project().is_none());
    }

    #[test]
    fn deleting_selected_project_goes_home() {
        let mut view = ViewState::new();
        view.open_project(project("p1"));
        assert_eq!(view.project_deleted("p1"), Effect::FetchTasks(None));
        assert_eq!(view.screen(), Screen::Home);
        assert!(view.selected_project().is_none());
    }

    #[test]
    fn deleting_other_project_keeps_view() {
        let mut view = ViewState::new();
        view.open_project(project("p1"));
        assert_eq!(view.project_deleted("p2"), Effect::None);
        assert_eq!(view.screen(), Screen::ProjectDetail);
        assert_eq!(view.scope(), Some("p1"));
    }

    #[test]
    fn sync_selected_picks_up_edits() {
        let mut view = ViewState::new();
        view.open_project(project("p1"));
        view.take_dirty();
        let mut renamed = project("p1");
        renamed.name = "Launch".into();
        view.sync_selected(&[renamed]);
        assert_eq!(view.selected_project().unwrap().name, "Launch");
        assert!(view.take_dirty());
    }

    #[test]
    fn tab_index_groups_detail_under_projects() {
        assert_eq!(Screen::ProjectDetail.tab_index(), Screen::Projects.tab_index());
        let titles: Vec<&str> = Screen::TABS.iter().map(|s| s.title()).collect();
        assert_eq!(titles, ["Home", "Tasks", "Projects"]);
    }
}
