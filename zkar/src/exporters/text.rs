use serz::stream::node::GraphNode;

use crate::{app::runtime::Config, exporters::exporter::Exporter};

/// Prints the stream as an indented tree of records
pub struct Text<'a> {
    /// Data that is setup from the application's runtime
    pub config: &'a Config,
}

impl<'a> Exporter<'a> for Text<'a> {
    fn new(config: &'a Config) -> Self {
        Text { config }
    }

    fn format(&mut self) -> String {
        self.config.serialization.to_display_string()
    }
}
