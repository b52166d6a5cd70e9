//! Screen view models and orchestration for the fittrack daily log.
//!
//! One view model per screen, each exposing a single reactive state
//! object on a `tokio::sync::watch` channel plus the explicit actions
//! the screen can take. Every aggregate is a full recomputation from
//! the store contents; the models listen to the shared data-change bus
//! and rebuild when something they show has changed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fittrack_app::{AppState, Dashboard};
//! use fittrack_store::Store;
//!
//! # async fn example() -> Result<(), fittrack_store::Error> {
//! let state = AppState::new(Store::open_default()?);
//! let dashboard = Arc::new(Dashboard::new(Arc::clone(&state)));
//! Arc::clone(&dashboard).start();
//!
//! dashboard.add_water(250).await;
//! println!("{} ml today", dashboard.current().water_consumed_ml);
//! # Ok(())
//! # }
//! ```

pub mod dashboard;
pub mod history;
pub mod onboarding;
pub mod settings;
pub mod state;
pub mod weekly;

pub use dashboard::{Dashboard, DashboardState};
pub use history::{History, HistoryState};
pub use onboarding::{Onboarding, OnboardingState, OnboardingStep};
pub use settings::{Settings, SettingsState};
pub use state::AppState;
pub use weekly::{Weekly, WeeklyState};
