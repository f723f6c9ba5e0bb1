use super::testing::{Drawn, RecordingSink};
use super::*;

#[test]
fn clear_sends_clear_and_home() {
    let mut lcd = Lcd::new(RecordingSink::new(), 20);
    lcd.clear().unwrap();
    assert_eq!(lcd.sink().unwrap().bytes(), vec![0xFE, 0x58, 0xFE, 0x48]);
}

#[test]
fn header_with_text_clears_then_centers_both_rows() {
    let mut lcd = Lcd::new(RecordingSink::new(), 20);
    lcd.header_with_text("orbital", "* paused *").unwrap();

    let sink = lcd.sink().unwrap();
    assert_eq!(sink.writes[0], protocol::CLEAR_AND_HOME.to_vec());
    assert_eq!(
        sink.drawn(),
        vec![
            Drawn {
                column: 7,
                row: 1,
                text: "orbital".into()
            },
            Drawn {
                column: 6,
                row: 2,
                text: "* paused *".into()
            },
        ]
    );
}

#[test]
fn progress_bar_write() {
    let mut lcd = Lcd::new(RecordingSink::new(), 20);
    lcd.progress_bar(42).unwrap();
    assert_eq!(
        lcd.sink().unwrap().bytes(),
        vec![0xFE, 0x7C, 0x01, 0x02, 0x00, 42]
    );
}

#[test]
fn detached_lcd_drops_writes_without_error() {
    let mut lcd: Lcd<RecordingSink> = Lcd::detached(20);
    assert!(!lcd.is_attached());
    lcd.clear().unwrap();
    lcd.write_text("x", HAlign::Left, Row::Top).unwrap();
    assert!(lcd.reported_detached);
    assert!(lcd.sink().is_none());
}

#[test]
fn write_failures_propagate() {
    let mut sink = RecordingSink::new();
    sink.fail = true;
    let mut lcd = Lcd::new(sink, 20);
    let err = lcd.clear().unwrap_err();
    assert!(matches!(err, DisplayError::Io(_)));
}
