#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use duolink_node::config::{self, Parity};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
line:
  baud: 1200
  parity_bits: 1 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.line.baud, 1200);
    assert_eq!(cfg.line.parity, Parity::Odd);
    assert_eq!(cfg.session.tick_hz, 60);
    assert_eq!(cfg.session.start_margin_ticks, 239);
    assert_eq!(cfg.transport.transmit_attempts, 4);
}

#[test]
fn default_line_registers() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.line.divisor(), (96, 0));
    assert_eq!(cfg.line.lcr(), 0x0B);
    assert_eq!(cfg.line.fcr(), 0x47);
}

#[test]
fn rejects_out_of_range_values() {
    let cases = [
        "version: 1\nline:\n  baud: 0\n",
        "version: 1\nline:\n  data_bits: 9\n",
        "version: 1\nline:\n  rx_trigger: 3\n",
        "version: 1\nsession:\n  heartbeat_ticks: 0\n",
        "version: 1\ntransport:\n  transmit_attempts: 0\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert_eq!(err.code().as_str(), "BAD_CONFIG", "{yaml}");
    }
}

#[test]
fn rejects_unknown_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn shipped_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../duolink.yaml");
    let cfg = config::load_from_file(path).expect("shipped config must load");
    assert_eq!(cfg.line.rx_trigger, 4);
    assert!(cfg.line.fifo);
}
