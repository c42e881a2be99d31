use crate::error::Result;
use crate::geometry::fmt_num;
use crate::plotter::{PlotContext, Plotter, TextItem};

/// Page size the caller needs to wrap a footprint fragment.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct PageInfo {
    pub width: f64,
    pub height: f64,
}

/// Plain SVG emitter for footprint overlays.
#[derive(Debug, Default)]
pub struct SvgPlotter {
    context: PlotContext,
    page: PageInfo,
    standalone: bool,
}

impl SvgPlotter {
    pub fn new(page: PageInfo, standalone: bool) -> Self {
        SvgPlotter {
            context: PlotContext::new(),
            page,
            standalone,
        }
    }

    pub fn into_output(self) -> String {
        self.context.into_output()
    }
}

impl Plotter for SvgPlotter {
    fn context(&mut self) -> &mut PlotContext {
        &mut self.context
    }

    fn output(&self) -> &str {
        self.context.output()
    }

    fn start_plot(&mut self) {
        if self.standalone {
            let (w, h) = (fmt_num(self.page.width), fmt_num(self.page.height));
            self.context.push_raw(&format!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">"
            ));
        }
    }

    fn end_plot(&mut self) -> Result<()> {
        self.context.check_balanced()?;
        if self.standalone {
            self.context.push_raw("\n</svg>\n");
        }
        Ok(())
    }

    fn label(&mut self, item: &TextItem) {
        let extra: &[(&str, &str)] = if item.text.is_empty() {
            &[("data-attribute", "ref")]
        } else {
            &[]
        };
        self.context.text(item, Some("reference $cell_id"), extra);
    }

    fn value(&mut self, item: &TextItem) {
        let extra: &[(&str, &str)] = if item.text.is_empty() {
            &[("data-attribute", "value")]
        } else {
            &[]
        };
        self.context.text(item, Some("value $cell_id"), extra);
    }
}
