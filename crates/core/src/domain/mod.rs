//! Concrete record types, one module per dashboard page.

/// Declares a backend label enum: snake_case wire names, an `Unknown`
/// catch-all for labels this build does not know, `as_str`, `Display`
/// and a case-insensitive `FromStr`.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
            /// A label this build does not recognize.
            #[serde(rename = "unknown", other)]
            Unknown,
        }

        impl $name {
            /// Every known label, in workflow order.
            pub const ALL_VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match *self {
                    $(Self::$variant => $label,)+
                    Self::Unknown => "unknown",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::ALL_VARIANTS.iter().copied().find(|v| v.as_str() == wanted).ok_or_else(|| {
                    $crate::error::CoreError::InvalidStatus { kind: $kind, value: s.to_owned() }
                })
            }
        }
    };
}

pub mod ambassador;
pub mod booking;
pub mod campaign;
pub mod lead_campaign;
pub mod message;
pub mod podcast_lead;
pub mod survey;

pub use ambassador::{Ambassador, AmbassadorStats, AmbassadorStatus, ScoreBand};
pub use booking::{Booking, BookingStats, BookingStatus};
pub use campaign::{Campaign, CampaignStats, CampaignStatus, SearchCriteria};
pub use lead_campaign::{CampaignOwner, LeadCampaign, LeadCampaignStats, LeadCampaignStatus, LeadSource};
pub use message::{MessageStats, MessageStatus, MessageType, OutreachMessage, PersonalizationContext};
pub use podcast_lead::{AudienceSize, LeadStats, LeadStatus, PodcastLead, PriorityLevel};
pub use survey::{Survey, SurveyStats, SurveyStatus, SurveyType};
