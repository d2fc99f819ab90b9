//! Report variants.
//!
//! Each variant exposes a pure `compute` that turns loaded records plus a
//! filter selection into an [`Insight`](crate::models::Insight).

pub mod campaign;
pub mod family;
pub mod income;

pub use campaign::{CampaignFilter, EducationFilter};
pub use family::FamilyFilter;
pub use income::IncomeFilter;
