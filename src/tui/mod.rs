//! Interactive results page
//!
//! Search box, hits and the recent searches panel drawn with ratatui.

pub mod app;
pub mod colors;
pub mod list;
pub mod ui;

use crate::{logging, AppConfig};
use app::App;

/// Run the results page until the user quits
pub fn run(config: AppConfig) -> crate::Result<()> {
    let mut app = App::new(config)?;
    logging::info("TUI", "Entering interactive mode");

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    let shutdown = app.shutdown();
    logging::info("TUI", "Left interactive mode");
    result.and(shutdown)
}
