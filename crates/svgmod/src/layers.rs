//! KiCad layer name table.
//!
//! Maps SVG layer labels to KiCad layer identifiers: numeric front/back
//! indices for the legacy format and names for the pretty format. The table
//! is an explicit value handed to import and export rather than global
//! state, so callers can extend or replace it.

/// Output identifiers for one named layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerInfo {
    /// Legacy numeric layer for the front-side module.
    pub front: Option<u32>,
    /// Legacy numeric layer for the mirrored back-side module.
    pub back: Option<u32>,
    /// Pretty-format layer name, combined with an `F.`/`B.` side prefix.
    pub pretty: Option<&'static str>,
}

/// Ordered table of recognized layer names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMap {
    entries: Vec<(&'static str, LayerInfo)>,
}

impl LayerMap {
    /// The stock KiCad table used by the converter.
    pub fn kicad_default() -> Self {
        const fn info(front: Option<u32>, back: Option<u32>, pretty: Option<&'static str>) -> LayerInfo {
            LayerInfo { front, back, pretty }
        }

        Self {
            entries: vec![
                ("Cu", info(Some(15), Some(0), Some("Cu"))),
                ("Adhes", info(Some(17), Some(16), Some("Adhes"))),
                ("Paste", info(Some(19), Some(18), Some("Paste"))),
                ("SilkS", info(Some(21), Some(20), Some("SilkS"))),
                ("Mask", info(Some(23), Some(22), Some("Mask"))),
                ("Dwgs.User", info(Some(24), Some(24), None)),
                ("Cmts.User", info(Some(25), Some(25), None)),
                ("Eco1.User", info(Some(26), Some(26), None)),
                ("Eco2.User", info(Some(27), Some(27), None)),
                ("Edge.Cuts", info(Some(28), Some(28), None)),
                ("CrtYd", info(None, None, Some("CrtYd"))),
                ("Fab", info(None, None, Some("Fab"))),
            ],
        }
    }

    /// Look up a layer by its exact name.
    pub fn get(&self, name: &str) -> Option<&LayerInfo> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, info)| info)
    }

    /// Return the canonical layer name matching an SVG group label, if any.
    pub fn match_label(&self, label: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(name, _)| *name)
    }

    /// Iterate entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &LayerInfo)> {
        self.entries.iter().map(|(name, info)| (*name, info))
    }
}

impl Default for LayerMap {
    fn default() -> Self {
        Self::kicad_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_copper_front_and_back() {
        let map = LayerMap::kicad_default();
        let cu = map.get("Cu").expect("Cu layer");
        assert_eq!(cu.front, Some(15));
        assert_eq!(cu.back, Some(0));
        assert_eq!(cu.pretty, Some("Cu"));
    }

    #[test]
    fn user_layers_have_no_pretty_name() {
        let map = LayerMap::kicad_default();
        let edge = map.get("Edge.Cuts").expect("Edge.Cuts layer");
        assert_eq!(edge.front, Some(28));
        assert_eq!(edge.back, Some(28));
        assert_eq!(edge.pretty, None);
    }

    #[test]
    fn courtyard_is_pretty_only() {
        let map = LayerMap::kicad_default();
        let crtyd = map.get("CrtYd").expect("CrtYd layer");
        assert_eq!(crtyd.front, None);
        assert_eq!(crtyd.back, None);
        assert_eq!(crtyd.pretty, Some("CrtYd"));
    }

    #[test]
    fn match_label_is_exact() {
        let map = LayerMap::kicad_default();
        assert_eq!(map.match_label("SilkS"), Some("SilkS"));
        assert_eq!(map.match_label("silks"), None);
        assert_eq!(map.match_label("SilkS-Extra"), None);
    }
}
