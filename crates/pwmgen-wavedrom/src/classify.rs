//! Fixed name → role/order table for the PWM controller's diagram signals.

/// Which exported table a signal lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalRole {
    /// Driven by the testbench.
    Input,
    /// Checked against the design.
    Output,
    /// Drawn for readability only (clocks, internal state).
    Ignored,
}

/// One row of [`SIGNAL_TABLE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalClass {
    /// Signal name as written in the diagram.
    pub name: &'static str,
    /// Destination table.
    pub role: SignalRole,
    /// Column position inside that table (ascending).
    pub order: u32,
}

const fn entry(name: &'static str, role: SignalRole, order: u32) -> SignalClass {
    SignalClass { name, role, order }
}

/// Known signals. Names not listed here are dropped.
pub const SIGNAL_TABLE: &[SignalClass] = &[
    entry("CLK", SignalRole::Ignored, 0),
    entry("EN", SignalRole::Input, 1),
    entry("N_ADDR", SignalRole::Input, 2),
    entry("N_TOT_CYC", SignalRole::Input, 3),
    entry("UPD_MEM", SignalRole::Input, 4),
    entry("CNT_END", SignalRole::Input, 5),
    entry("NEXT_CONFIG_0", SignalRole::Input, 6),
    entry("NEXT_CONFIG_1", SignalRole::Input, 7),
    entry("NEXT_CONFIG_2", SignalRole::Input, 8),
    entry("NEXT_CONFIG_3", SignalRole::Input, 9),
    entry("NEXT_CONFIG_4", SignalRole::Input, 10),
    entry("NEXT_CONFIG_5", SignalRole::Input, 11),
    entry("NEXT_CONFIG_6", SignalRole::Input, 12),
    entry("RD_DATA", SignalRole::Ignored, 0),
    entry("STATE", SignalRole::Ignored, 0),
    entry("RD_ADDR", SignalRole::Output, 1),
    entry("EN_CNT", SignalRole::Output, 2),
    entry("SWITCH_MEM", SignalRole::Output, 3),
    entry("LAST_CYC", SignalRole::Output, 4),
    entry("EN_WR_CONFIG", SignalRole::Output, 5),
];

/// Look up a signal by exact name.
#[must_use]
pub fn classify(name: &str) -> Option<&'static SignalClass> {
    SIGNAL_TABLE.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        let en = classify("EN").unwrap();
        assert_eq!((en.role, en.order), (SignalRole::Input, 1));
        let wr = classify("EN_WR_CONFIG").unwrap();
        assert_eq!((wr.role, wr.order), (SignalRole::Output, 5));
        assert_eq!(classify("CLK").unwrap().role, SignalRole::Ignored);
    }

    #[test]
    fn unknown_and_case_mismatched_names_are_unlisted() {
        assert!(classify("en").is_none());
        assert!(classify("PWM").is_none());
    }

    #[test]
    fn orders_are_unique_per_role() {
        for role in [SignalRole::Input, SignalRole::Output] {
            let mut orders: Vec<u32> = SIGNAL_TABLE
                .iter()
                .filter(|c| c.role == role)
                .map(|c| c.order)
                .collect();
            let n = orders.len();
            orders.sort_unstable();
            orders.dedup();
            assert_eq!(orders.len(), n);
        }
    }
}
