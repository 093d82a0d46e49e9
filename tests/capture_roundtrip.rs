//! End-to-end capture: raw stream bytes through the driver into a CSV
//! file on disk.

use std::io::Cursor;

use imu_logger::driver::{CaptureDriver, CaptureError};
use imu_logger::sink::CsvSink;
use imu_logger::source::{ReaderSource, SourceError};

const HEADER: &str = "Epoch,UTC Time,UK Time,Elapsed Time,\
                      x_accel,y_accel,z_accel,x_gyro,y_gyro,z_gyro,x_mag,y_mag,z_mag";

fn run_capture(stream: &str) -> (Result<(), CaptureError>, u64, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.csv");

    let sink = CsvSink::create(&path).unwrap();
    let source = ReaderSource::new(Cursor::new(stream.as_bytes().to_vec()));
    let mut driver = CaptureDriver::new(source, sink);

    let result = driver.run();
    let contents = std::fs::read_to_string(&path).unwrap();
    (result, driver.frames_written(), contents)
}

#[test]
fn capture_writes_header_and_ordered_rows() {
    let stream = concat!(
        "#1&2024-01-01 00:00:01&2024-01-01 00:00:01&00:01&",
        "x_accel = 1.0/y_accel = 2.0/z_accel = 3.0&",
        "x_gyro = 0.1/y_gyro = 0.2/z_gyro =  0.3&",
        "x_mag = 10/y_mag = 20/z_mag = 30&\r\n",
        "#2&2024-01-01 00:00:02&2024-01-01 00:00:02&00:02&",
        "x_accel = -1.0/y_accel = -2.0/z_accel = -3.0&",
        "x_gyro = 0.4/y_gyro = 0.5/z_gyro =  0.6&",
        "x_mag = 11/y_mag = 21/z_mag = 31&\r\n",
    );

    let (result, frames, contents) = run_capture(stream);

    // The in-memory stream ends, which reads as the device going away.
    assert!(matches!(
        result,
        Err(CaptureError::Source(SourceError::Disconnected))
    ));
    assert_eq!(frames, 2);

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        "1,2024-01-01 00:00:01,2024-01-01 00:00:01,00:01,1,2,3,0.1,0.2,0.3,10,20,30"
    );
    assert_eq!(
        lines[2],
        "2,2024-01-01 00:00:02,2024-01-01 00:00:02,00:02,-1,-2,-3,0.4,0.5,0.6,11,21,31"
    );
}

#[test]
fn capture_survives_bad_frames_and_keeps_the_rest() {
    let stream = concat!(
        // Epoch is not an integer: the whole frame is discarded.
        "#nope&a&b&c&x=1/y=2/z=3&x=4/y=5/z=6&x=7/y=8/z=9&\r\n",
        // Accel segment has two fragments: discarded too.
        "#2&a&b&c&x=1/y=2&x=4/y=5/z=6&x=7/y=8/z=9&\r\n",
        // Malformed accel value: kept, with the fallback in column 5.
        "#3&a&b&c&x=oops/y=2/z=3&x=4/y=5/z=6&x=7/y=8/z=9&\r\n",
    );

    let (_, frames, contents) = run_capture(stream);
    assert_eq!(frames, 1);

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "3,a,b,c,0,2,3,4,5,6,7,8,9");
}

#[test]
fn capture_with_empty_stream_leaves_header_only() {
    let (result, frames, contents) = run_capture("");

    assert!(matches!(
        result,
        Err(CaptureError::Source(SourceError::Disconnected))
    ));
    assert_eq!(frames, 0);
    assert_eq!(contents.lines().collect::<Vec<_>>(), vec![HEADER]);
}
