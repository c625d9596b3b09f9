pub mod ancestor;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod flowchart;
pub mod identity;
pub mod parser;
pub mod record;
pub mod render;
pub mod theme;
pub mod timeline;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, FlowchartConfig, TimelineConfig, load_config};
pub use error::{Error, Result};
pub use flowchart::{Flowchart, build_flowchart};
pub use identity::RenderKeys;
pub use record::{Person, PersonId, RawRow, normalize};
pub use render::{Diagrams, render_csv, render_diagrams, write_text};
pub use theme::Theme;
pub use timeline::{Timeline, build_timeline};
