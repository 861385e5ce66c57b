use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MutationPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl MutationPhase {
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Submitting)
                | (Self::Submitting, Self::Succeeded)
                | (Self::Submitting, Self::Failed)
                | (Self::Succeeded, Self::Idle)
                | (Self::Failed, Self::Idle)
        )
    }
}
