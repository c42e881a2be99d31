use crate::plotter::{PlotContext, Plotter, TextItem};
use std::borrow::Cow;

/// Namespace prefix the diagram renderer reads its structural attributes from.
pub const SKIN_NAMESPACE: &str = "s";
pub const SKIN_NAMESPACE_URI: &str = "https://github.com/nturley/netlistsvg";

/// Emits symbols in the netlist renderer's skin dialect.
///
/// Labels and values carry the `$cell_id` class token so the renderer can tie
/// them back to the instantiated cell.
#[derive(Debug, Default)]
pub struct SkinPlotter {
    context: PlotContext,
    standalone: bool,
}

impl SkinPlotter {
    pub fn new(standalone: bool) -> Self {
        SkinPlotter {
            context: PlotContext::new(),
            standalone,
        }
    }

    pub fn into_output(self) -> String {
        self.context.into_output()
    }
}

impl Plotter for SkinPlotter {
    fn context(&mut self) -> &mut PlotContext {
        &mut self.context
    }

    fn output(&self) -> &str {
        self.context.output()
    }

    fn start_plot(&mut self) {
        if self.standalone {
            self.context.push_raw(&format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" xmlns:{}=\"{}\">",
                SKIN_NAMESPACE, SKIN_NAMESPACE_URI
            ));
        }
    }

    fn end_plot(&mut self) -> crate::error::Result<()> {
        self.context.check_balanced()?;
        if self.standalone {
            self.context.push_raw("\n</svg>\n");
        }
        Ok(())
    }

    fn qualify<'n>(&self, name: &'n str) -> Cow<'n, str> {
        Cow::Owned(format!("{}:{}", SKIN_NAMESPACE, name))
    }

    fn label(&mut self, item: &TextItem) {
        let extra: &[(&str, &str)] = if item.text.is_empty() {
            &[("s:attribute", "ref")]
        } else {
            &[]
        };
        self.context.text(item, Some("nodelabel $cell_id"), extra);
    }

    fn value(&mut self, item: &TextItem) {
        let extra: &[(&str, &str)] = if item.text.is_empty() {
            &[("s:attribute", "value")]
        } else {
            &[]
        };
        self.context.text(item, Some("nodevalue $cell_id"), extra);
    }
}
