//! OED peril codes and their descriptive names

/// An OED peril with the name used as its key in the exposure summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peril {
    pub name: &'static str,
    pub code: &'static str,
}

const fn peril(name: &'static str, code: &'static str) -> Peril {
    Peril { name, code }
}

pub const PERILS: [Peril; 31] = [
    peril("all perils", "AA1"),
    // Earthquake
    peril("earthquake", "QQ1"),
    peril("earthquake shake only", "QEQ"),
    peril("fire following", "QFF"),
    peril("liquefaction", "QLF"),
    peril("landslide", "QLS"),
    peril("sprinkler leakage", "QSL"),
    peril("tsunami", "QTS"),
    // Wind
    peril("windstorm with storm surge", "WW1"),
    peril("windstorm without storm surge", "WW2"),
    peril("tropical cyclone", "WTC"),
    peril("extra tropical cyclone", "WEC"),
    peril("storm surge", "WSS"),
    // Convective storm
    peril("severe convective storm", "XX1"),
    peril("straight-line wind", "XSL"),
    peril("tornado", "XTD"),
    peril("hail", "XHL"),
    peril("lightning", "XLT"),
    // Flood
    peril("flood without storm surge", "OO1"),
    peril("river flood", "ORF"),
    peril("flash flood", "OSF"),
    // Winter storm
    peril("winter storm", "ZZ1"),
    peril("snow", "ZST"),
    peril("ice", "ZIC"),
    peril("freeze", "ZFZ"),
    // Wildfire
    peril("wildfire with smoke", "BB1"),
    peril("wildfire", "BFR"),
    peril("smoke", "BSK"),
    // Terrorism
    peril("terrorism", "MM1"),
    peril("conventional terrorism", "MTR"),
    peril("nbcr terrorism", "MNC"),
];

/// Descriptive name for an OED peril code
pub fn peril_name(code: &str) -> Option<&'static str> {
    PERILS.iter().find(|p| p.code == code).map(|p| p.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_peril_lookup() {
        assert_eq!(peril_name("WTC"), Some("tropical cyclone"));
        assert_eq!(peril_name("BFR"), Some("wildfire"));
        assert_eq!(peril_name("XYZ"), None);
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let codes: HashSet<_> = PERILS.iter().map(|p| p.code).collect();
        let names: HashSet<_> = PERILS.iter().map(|p| p.name).collect();
        assert_eq!(codes.len(), PERILS.len());
        assert_eq!(names.len(), PERILS.len());
    }
}
