//! Historical imagery epochs and the WMS authorities serving them.

use std::fmt;

/// One historical imagery dataset: the year it is selected by, the WMS
/// endpoint that renders it and the layer name to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmsEpoch {
    pub year: &'static str,
    pub endpoint: &'static str,
    pub layer: &'static str,
}

impl fmt::Display for WmsEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} @ {})", self.year, self.layer, self.endpoint)
    }
}

const GEOHUB_1896: &str =
    "https://geohub.gov.mt/arcgis/services/NSDI/Joint_Ordnance_Survey_1896/MapServer/WMSServer";

macro_rules! ortho {
    ($year:literal) => {
        WmsEpoch {
            year: $year,
            endpoint: concat!("https://malta.coverage.wetransform.eu/wms/ortho_", $year, "/ows"),
            layer: concat!("ortho_", $year),
        }
    };
}

/// Every epoch the proxy knows about. Fixed at build time.
pub const EPOCHS: &[WmsEpoch] = &[
    WmsEpoch {
        year: "1896",
        endpoint: GEOHUB_1896,
        layer: "0",
    },
    ortho!("1957"),
    ortho!("1967"),
    ortho!("1978"),
    ortho!("1988"),
    ortho!("1998"),
    ortho!("2004"),
    ortho!("2008"),
    ortho!("2012"),
    ortho!("2016"),
    ortho!("2018"),
];

impl WmsEpoch {
    /// Looks up an epoch by its year selector.
    pub fn lookup(year: &str) -> Option<&'static WmsEpoch> {
        EPOCHS.iter().find(|epoch| epoch.year == year)
    }

    /// Year selectors of every known epoch, oldest first.
    pub fn years() -> impl Iterator<Item = &'static str> {
        EPOCHS.iter().map(|epoch| epoch.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_1896_uses_geohub_layer_zero() {
        let epoch = WmsEpoch::lookup("1896").unwrap();
        assert_eq!(epoch.endpoint, GEOHUB_1896);
        assert_eq!(epoch.layer, "0");
    }

    #[test]
    fn test_ortho_year_endpoint_and_layer() {
        let epoch = WmsEpoch::lookup("2018").unwrap();
        assert_eq!(
            epoch.endpoint,
            "https://malta.coverage.wetransform.eu/wms/ortho_2018/ows"
        );
        assert_eq!(epoch.layer, "ortho_2018");
    }

    #[test]
    fn test_unknown_year() {
        assert!(WmsEpoch::lookup("1900").is_none());
        assert!(WmsEpoch::lookup("").is_none());
        assert!(WmsEpoch::lookup(" 2018").is_none());
    }

    #[test]
    fn test_years_unique_and_sorted() {
        let years: Vec<_> = WmsEpoch::years().collect();
        let mut sorted = years.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(years, sorted);
    }
}
