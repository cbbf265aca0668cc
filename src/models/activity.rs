#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    Active,
    Inactive,
}

impl Default for ActivityState {
    fn default() -> Self {
        ActivityState::Active
    }
}

impl ActivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Active => "Active",
            ActivityState::Inactive => "Inactive",
        }
    }
}
