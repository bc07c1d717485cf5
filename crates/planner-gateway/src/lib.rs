//! `planner-gateway` — HTTP surface of TeamPlanner.
//!
//! Routes:
//!
//! | Method | Path                 | Handler                          |
//! |--------|----------------------|----------------------------------|
//! | GET    | `/health`            | [`http::health::health_handler`] |
//! | GET    | `/`                  | redirect to the planning UI      |
//! | GET    | `/static/index.html` | embedded planning UI             |
//! | GET    | `/api/users`         | list users                       |
//! | POST   | `/api/users`         | register a user                  |
//! | GET    | `/api/schedule`      | entries in `[start, end]`        |
//! | PUT    | `/api/schedule`      | assign a status for one day      |

pub mod app;
pub mod db;
pub mod http;

pub use app::{build_router, AppState};
