//! `setoption` surface: the small set of tunables a GUI can change
//! between searches.

#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub move_overhead_ms: u64,
    pub multi_pv: usize,
    pub ponder: bool,
    pub chess960: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_mb: 16,
            threads: 1,
            move_overhead_ms: 30,
            multi_pv: 1,
            ponder: false,
            chess960: false,
        }
    }
}

/// One line of a UCI `option name ... type ...` announcement.
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: &'static str,
    pub default: &'static str,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

pub const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec { name: "Hash", kind: "spin", default: "16", min: Some(1), max: Some(1 << 20) },
    OptionSpec { name: "Threads", kind: "spin", default: "1", min: Some(1), max: Some(512) },
    OptionSpec { name: "Move Overhead", kind: "spin", default: "30", min: Some(0), max: Some(5000) },
    OptionSpec { name: "MultiPV", kind: "spin", default: "1", min: Some(1), max: Some(256) },
    OptionSpec { name: "Ponder", kind: "check", default: "false", min: None, max: None },
    OptionSpec { name: "UCI_Chess960", kind: "check", default: "false", min: None, max: None },
];

impl EngineOptions {
    /// Applies `setoption name <name> value <value>`. Unknown names are
    /// silently ignored, matching the control-protocol's drop-the-command
    /// policy for anything it doesn't recognize.
    pub fn apply(&mut self, name: &str, value: &str) {
        match name.to_ascii_lowercase().as_str() {
            "hash" => {
                if let Ok(v) = value.parse::<usize>() {
                    self.hash_mb = v.clamp(1, 1 << 20);
                }
            }
            "threads" => {
                if let Ok(v) = value.parse::<usize>() {
                    self.threads = v.clamp(1, 512);
                }
            }
            "move overhead" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.move_overhead_ms = v;
                }
            }
            "multipv" => {
                if let Ok(v) = value.parse::<usize>() {
                    self.multi_pv = v.max(1);
                }
            }
            "ponder" => self.ponder = value.eq_ignore_ascii_case("true"),
            "uci_chess960" => self.chess960 = value.eq_ignore_ascii_case("true"),
            _ => {
                #[cfg(feature = "logging")]
                log::warn!("unknown option: {name}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_clamped() {
        let mut opts = EngineOptions::default();
        opts.apply("Hash", "999999999");
        assert_eq!(opts.hash_mb, 1 << 20);
    }

    #[test]
    fn unknown_option_is_ignored() {
        let mut opts = EngineOptions::default();
        let before = opts.hash_mb;
        opts.apply("NotARealOption", "123");
        assert_eq!(opts.hash_mb, before);
    }
}
