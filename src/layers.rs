use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// KiCad board layers a footprint item can live on, in KiCad stack order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PcbLayer {
    #[serde(rename = "F.Cu")]
    FCu,
    #[serde(rename = "B.Cu")]
    BCu,
    #[serde(rename = "B.Adhes")]
    BAdhes,
    #[serde(rename = "F.Adhes")]
    FAdhes,
    #[serde(rename = "B.Paste")]
    BPaste,
    #[serde(rename = "F.Paste")]
    FPaste,
    #[serde(rename = "B.SilkS")]
    BSilkS,
    #[serde(rename = "F.SilkS")]
    FSilkS,
    #[serde(rename = "B.Mask")]
    BMask,
    #[serde(rename = "F.Mask")]
    FMask,
    #[serde(rename = "Dwgs.User")]
    DwgsUser,
    #[serde(rename = "Cmts.User")]
    CmtsUser,
    #[serde(rename = "Eco1.User")]
    Eco1User,
    #[serde(rename = "Eco2.User")]
    Eco2User,
    #[serde(rename = "Edge.Cuts")]
    EdgeCuts,
    #[serde(rename = "Margin")]
    Margin,
    #[serde(rename = "B.CrtYd")]
    BCrtYd,
    #[serde(rename = "F.CrtYd")]
    FCrtYd,
    #[serde(rename = "B.Fab")]
    BFab,
    #[serde(rename = "F.Fab")]
    FFab,
}

impl PcbLayer {
    pub const ALL: [PcbLayer; 20] = [
        PcbLayer::FCu,
        PcbLayer::BCu,
        PcbLayer::BAdhes,
        PcbLayer::FAdhes,
        PcbLayer::BPaste,
        PcbLayer::FPaste,
        PcbLayer::BSilkS,
        PcbLayer::FSilkS,
        PcbLayer::BMask,
        PcbLayer::FMask,
        PcbLayer::DwgsUser,
        PcbLayer::CmtsUser,
        PcbLayer::Eco1User,
        PcbLayer::Eco2User,
        PcbLayer::EdgeCuts,
        PcbLayer::Margin,
        PcbLayer::BCrtYd,
        PcbLayer::FCrtYd,
        PcbLayer::BFab,
        PcbLayer::FFab,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PcbLayer::FCu => "F.Cu",
            PcbLayer::BCu => "B.Cu",
            PcbLayer::BAdhes => "B.Adhes",
            PcbLayer::FAdhes => "F.Adhes",
            PcbLayer::BPaste => "B.Paste",
            PcbLayer::FPaste => "F.Paste",
            PcbLayer::BSilkS => "B.SilkS",
            PcbLayer::FSilkS => "F.SilkS",
            PcbLayer::BMask => "B.Mask",
            PcbLayer::FMask => "F.Mask",
            PcbLayer::DwgsUser => "Dwgs.User",
            PcbLayer::CmtsUser => "Cmts.User",
            PcbLayer::Eco1User => "Eco1.User",
            PcbLayer::Eco2User => "Eco2.User",
            PcbLayer::EdgeCuts => "Edge.Cuts",
            PcbLayer::Margin => "Margin",
            PcbLayer::BCrtYd => "B.CrtYd",
            PcbLayer::FCrtYd => "F.CrtYd",
            PcbLayer::BFab => "B.Fab",
            PcbLayer::FFab => "F.Fab",
        }
    }
}

/// Set of visible layers used to filter footprint edges and texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSet(BTreeSet<PcbLayer>);

impl LayerSet {
    pub fn new(layers: impl IntoIterator<Item = PcbLayer>) -> Self {
        LayerSet(layers.into_iter().collect())
    }

    pub fn all() -> Self {
        LayerSet::new(PcbLayer::ALL)
    }

    /// Front copper, adhesive, paste, silkscreen, drawings, board edge and fab.
    ///
    /// Active whenever a reference or value override is rendered.
    pub fn front_assembly() -> Self {
        LayerSet::new([
            PcbLayer::FCu,
            PcbLayer::FAdhes,
            PcbLayer::FPaste,
            PcbLayer::FSilkS,
            PcbLayer::DwgsUser,
            PcbLayer::EdgeCuts,
            PcbLayer::FFab,
        ])
    }

    pub fn contains(&self, layer: PcbLayer) -> bool {
        self.0.contains(&layer)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PcbLayer> + '_ {
        self.0.iter().copied()
    }
}
