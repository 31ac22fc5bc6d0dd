pub mod controller;
pub mod cookies;
pub mod view;

pub use controller::{Location, Outcome, SurveyFlow};
pub use cookies::{CookieJar, SetCookie};
pub use view::{Page, RenderError, Renderer, View};
