use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Signs the recognizer can report.
///
/// "No gesture" is not a variant: it is expressed as `Option::<Gesture>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gesture {
    Hello,
    #[serde(rename = "I Love You")]
    ILoveYou,
    Good,
    Bad,
    Yes,
    #[serde(rename = "I/Me")]
    IMe,
    No,
    Okay,
    #[serde(rename = "Thank You")]
    ThankYou,
}

impl Gesture {
    pub const ALL: [Gesture; 9] = [
        Gesture::Hello,
        Gesture::ILoveYou,
        Gesture::Good,
        Gesture::Bad,
        Gesture::Yes,
        Gesture::IMe,
        Gesture::No,
        Gesture::Okay,
        Gesture::ThankYou,
    ];

    /// Display name, also used as the key in stored training data.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hello => "Hello",
            Self::ILoveYou => "I Love You",
            Self::Good => "Good",
            Self::Bad => "Bad",
            Self::Yes => "Yes",
            Self::IMe => "I/Me",
            Self::No => "No",
            Self::Okay => "Okay",
            Self::ThankYou => "Thank You",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = DataError;

    /// Accepts display names case-insensitively, plus the filesystem-safe
    /// spelling where `/` is written as `_` ("I_Me").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gesture::ALL
            .iter()
            .copied()
            .find(|gesture| {
                let name = gesture.name();
                name.eq_ignore_ascii_case(s)
                    || (name.len() == s.len()
                        && name
                            .bytes()
                            .zip(s.bytes())
                            .all(|(a, b)| a.eq_ignore_ascii_case(&b) || (a == b'/' && b == b'_')))
            })
            .ok_or(DataError::UnknownGesture)
    }
}
