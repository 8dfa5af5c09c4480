//! Integration tests for the request trace loader.

use std::io::Write;

use ddr4_ab::common::{Address, DramError, RequestType};
use ddr4_ab::config::Config;
use ddr4_ab::dram::DeviceSpec;
use ddr4_ab::sim::{load_trace, parse_trace, Request};

/// Default part with one channel and two ranks.
fn spec() -> DeviceSpec {
    let config = Config::from_toml_str("[device]\nranks = 2").unwrap();
    config.build_device().unwrap().spec().clone()
}

fn trace_error_line(result: Result<Vec<Request>, DramError>) -> usize {
    match result {
        Err(DramError::Trace { line, .. }) => line,
        other => panic!("expected a trace error, got {:?}", other),
    }
}

/// Tests every request form.
#[test]
fn test_parse_all_forms() {
    let trace = "\
R 0 0 1 2 5 16
READ 0 1 3 3 65535 1023
W 0 0 0 0 5 17
REF 0 0
PD 0 1
SR 0 1
";
    let requests = parse_trace(trace, &spec()).unwrap();
    assert_eq!(requests.len(), 6);
    assert_eq!(
        requests[0],
        Request::new(RequestType::Read, Address::column(0, 0, 1, 2, 5, 16))
    );
    assert_eq!(requests[1].addr.row, Some(65535));
    assert_eq!(requests[2].kind, RequestType::Write);
    assert_eq!(
        requests[3],
        Request::new(RequestType::Refresh, Address::rank(0, 0))
    );
    assert_eq!(requests[4].kind, RequestType::PowerDown);
    assert_eq!(requests[5].kind, RequestType::SelfRefresh);
}

/// Tests that comments and blank lines are skipped.
#[test]
fn test_parse_skips_comments() {
    let trace = "# header\n\n   \nR 0 0 0 0 1 0\n  # indented comment\nW 0 0 0 0 1 1\n";
    let requests = parse_trace(trace, &spec()).unwrap();
    assert_eq!(requests.len(), 2);
}

/// Tests that errors name the offending line.
#[test]
fn test_parse_errors() {
    let spec = spec();
    assert_eq!(trace_error_line(parse_trace("R 0 0 0 0 1 0\nX 0 0", &spec)), 2);
    assert_eq!(trace_error_line(parse_trace("R 0 0 0 0 1", &spec)), 1);
    assert_eq!(trace_error_line(parse_trace("REF 0 0 0", &spec)), 1);
    assert_eq!(trace_error_line(parse_trace("\n\nW 0 0 0 0 x 0", &spec)), 3);
}

/// Tests that indices are checked against the configured geometry.
#[test]
fn test_parse_out_of_range() {
    let spec = spec();
    // one channel
    assert_eq!(trace_error_line(parse_trace("REF 1 0", &spec)), 1);
    // two ranks
    assert_eq!(trace_error_line(parse_trace("PD 0 2", &spec)), 1);
    // four banks per group
    assert_eq!(trace_error_line(parse_trace("R 0 0 0 4 0 0", &spec)), 1);
    // 64K rows, 1K columns
    assert_eq!(trace_error_line(parse_trace("R 0 0 0 0 65536 0", &spec)), 1);
    assert_eq!(trace_error_line(parse_trace("R 0 0 0 0 0 1024", &spec)), 1);
}

/// Tests loading a trace file from disk.
#[test]
fn test_load_trace_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# kind ch ra bg ba row col").unwrap();
    writeln!(file, "R 0 0 0 0 7 0").unwrap();
    writeln!(file, "REF 0 1").unwrap();

    let requests = load_trace(file.path(), &spec()).unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].addr, Address::rank(0, 1));

    assert!(matches!(
        load_trace("/nonexistent/trace.txt", &spec()),
        Err(DramError::Io(_))
    ));
}
