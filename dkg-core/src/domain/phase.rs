use serde::{Deserialize, Serialize};

/// Phase of the DKG session. Phases are strictly sequential; in fast-sync
/// the driver may reach a phase before the phaser announces it, never
/// after.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    #[default]
    Init = 0,
    Deal = 1,
    Response = 2,
    Justification = 3,
    Finish = 4,
}

impl Phase {
    pub fn can_transition_to(self, target: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Init, Deal) | (Deal, Response) | (Response, Justification) | (Justification, Finish)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finish)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Deal => "deal",
            Phase::Response => "response",
            Phase::Justification => "justification",
            Phase::Finish => "finish",
        }
    }
}
