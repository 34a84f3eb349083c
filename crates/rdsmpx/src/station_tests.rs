// Unit tests for the station decoder, driven by synthesised groups.
// Included from station.rs via #[cfg(test)] mod.

use super::*;
use crate::record::Value;

const PI: u16 = 0x1234;

fn group(blocks: [u16; 4], num_blocks: u8) -> Group {
    Group::new(blocks, num_blocks)
}

/// Block 2 for a version-A group of the given type, with payload bits in the
/// low five positions as provided.
fn block2(type_num: u16, low_bits: u16) -> u16 {
    (type_num << 12) | low_bits
}

fn block2_b(type_num: u16, low_bits: u16) -> u16 {
    (type_num << 12) | 0x0800 | low_bits
}

fn ps_group(segment: u16, chars: &[u8; 2]) -> Group {
    group(
        [
            PI,
            block2(0, segment),
            0x0000,
            u16::from(chars[0]) << 8 | u16::from(chars[1]),
        ],
        4,
    )
}

fn str_value(record: &Record, key: &str) -> String {
    match record.get(key) {
        Some(Value::Str(s)) => s.clone(),
        other => panic!("expected string for key {}, got {:?}", key, other),
    }
}

#[test]
fn test_universal_fields() {
    let mut station = Station::new(PI);
    // TP set, PTY = 1 (News)
    let record = station.update(&group([PI, block2(0, 0) | 0x0400 | (1 << 5), 0, 0], 2));
    assert_eq!(str_value(&record, "pi"), "0x1234");
    assert_eq!(str_value(&record, "group"), "0A");
    assert_eq!(record.get("tp"), Some(&Value::Bool(true)));
    assert_eq!(str_value(&record, "prog_type"), "News");
    assert!(station.is_traffic_program());
    assert_eq!(station.program_type(), 1);
}

#[test]
fn test_type0_partial_group_has_no_ps_or_af() {
    // Two-block group: ta appears, alt_freqs and ps do not.
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(0, 0) | 0x0010, 0, 0], 2));
    assert_eq!(record.get("ta"), Some(&Value::Bool(true)));
    assert!(!record.contains("alt_freqs"));
    assert!(!record.contains("ps"));
}

#[test]
fn test_type0_ps_assembles_over_four_groups() {
    let mut station = Station::new(PI);
    let text = *b"HELLO   ";
    let mut last = None;
    for seg in 0..4u16 {
        let chars = [text[seg as usize * 2], text[seg as usize * 2 + 1]];
        last = Some(station.update(&ps_group(seg, &chars)));
    }
    let record = last.unwrap();
    assert_eq!(str_value(&record, "ps"), "HELLO   ");
    assert!(station.has_ps());
    assert_eq!(station.ps(), "HELLO   ");
}

#[test]
fn test_ps_snapshot_survives_new_cycle() {
    let mut station = Station::new(PI);
    for (seg, chars) in [b"HE", b"LL", b"O ", b"  "].iter().enumerate() {
        station.update(&ps_group(seg as u16, chars));
    }
    assert_eq!(station.ps(), "HELLO   ");

    // A new transmission starts; mid-cycle the old snapshot still stands
    // and no ps key is emitted.
    let record = station.update(&ps_group(0, b"  "));
    assert!(!record.contains("ps"));
    assert_eq!(station.ps(), "HELLO   ");

    // Completing the new cycle replaces it.
    let mut last = None;
    for (seg, chars) in [b"  ", b"WR", b"LD"].iter().enumerate() {
        last = Some(station.update(&ps_group(seg as u16 + 1, chars)));
    }
    assert_eq!(str_value(&last.unwrap(), "ps"), "    WRLD");
    assert_eq!(station.ps(), "    WRLD");
}

#[test]
fn test_type0_alt_freq_emission() {
    // Codes 225+2, then 87.6 and 94.3 MHz: the pair is emitted sorted once
    // the announced count is reached, and the set clears.
    let mut station = Station::new(PI);
    let af = |hi: u16, lo: u16| (hi << 8) | lo;

    let record = station.update(&group([PI, block2(0, 0), af(226, 143), 0], 3));
    assert!(!record.contains("alt_freqs"), "count not reached yet");

    let record = station.update(&group([PI, block2(0, 0), af(1, 205), 0], 3));
    match record.get("alt_freqs") {
        Some(Value::Freqs(freqs)) => assert_eq!(freqs.as_slice(), &[87.6, 101.8]),
        other => panic!("expected alt_freqs, got {:?}", other),
    }

    // The set was cleared: the next filler-only group emits nothing.
    let record = station.update(&group([PI, block2(0, 0), af(205, 205), 0], 3));
    assert!(!record.contains("alt_freqs"));
}

#[test]
fn test_type0_filler_codes_do_not_emit_empty_set() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(0, 0), (205 << 8) | 224, 0], 3));
    assert!(!record.contains("alt_freqs"));
}

#[test]
fn test_type0b_writes_ps_but_no_af() {
    let mut station = Station::new(PI);
    let mut last = None;
    for (seg, chars) in [b"RA", b"DI", b"O ", b"FM"].iter().enumerate() {
        let block4 = u16::from(chars[0]) << 8 | u16::from(chars[1]);
        last = Some(station.update(&group(
            [PI, block2_b(0, seg as u16), PI, block4],
            4,
        )));
    }
    let record = last.unwrap();
    assert_eq!(str_value(&record, "ps"), "RADIO FM");
    assert!(!record.contains("alt_freqs"));
}

#[test]
fn test_type1_country_from_ecc() {
    let mut station = Station::new(PI);
    // SLC variant 0, ECC 0xE1; PI country nibble 1 resolves to Greece.
    let record = station.update(&group([PI, block2(1, 0), 0x00E1, 0x8000], 4));
    assert_eq!(str_value(&record, "country"), "gr");
    assert_eq!(station.country(), Some("gr"));
    assert_eq!(station.country_code(), 1);
}

#[test]
fn test_type1_zero_ecc_is_ignored() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(1, 0), 0x0000, 0x8000], 4));
    assert!(!record.contains("country"));
    assert_eq!(station.country(), None);
}

#[test]
fn test_type1_tmc_id() {
    let mut station = Station::new(PI);
    // SLC variant 1, TMC id 0x456
    let record = station.update(&group([PI, block2(1, 0), 0x1456, 0x8000], 4));
    assert_eq!(str_value(&record, "tmc_id"), "0x456");
}

#[test]
fn test_type1_language() {
    let mut station = Station::new(PI);
    // SLC variant 3, language 0x09 (English)
    let record = station.update(&group([PI, block2(1, 0), 0x3009, 0x8000], 4));
    assert_eq!(str_value(&record, "language"), "English");
    assert_eq!(station.language(), "English");
}

#[test]
fn test_type1_ews_channel() {
    let mut station = Station::new(PI);
    // SLC variant 7, channel 0xABC
    let record = station.update(&group([PI, block2(1, 0), 0x7ABC, 0x8000], 4));
    assert_eq!(str_value(&record, "ews"), "0xabc");
}

#[test]
fn test_type1_linkage_and_pin() {
    let mut station = Station::new(PI);
    station.update(&group([PI, block2(1, 0), 0x8000 | 0x00E1, 0x8421], 4));
    assert!(station.has_linkage());
    assert_eq!(station.program_item_number(), 0x8421);
}

#[test]
fn test_type1_pager_fields() {
    let mut station = Station::new(PI);
    // TNG = 5, interval = 2 in block 2; variant 0 with OPC = 0x9 in block 3;
    // block 4 carries a PIN-less subtype-0 record (PAC, OPC).
    let block2 = block2(1, (5 << 2) | 2);
    let block4 = (0 << 10) | (0x2A << 4) | 0x7;
    station.update(&group([PI, block2, 0x09E1, block4], 4));
    let pager = station.pager();
    assert_eq!(pager.tng, 5);
    assert_eq!(pager.interval, 2);
    assert_eq!(pager.pac, 0x2A);
    assert_eq!(pager.opc, 0x7, "block 4 sub-record overrides the OPC");
}

#[test]
fn test_type1_requires_four_blocks() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(1, 0), 0x00E1, 0], 3));
    assert!(!record.contains("country"));
}

#[test]
fn test_type2_radiotext_completion() {
    let mut station = Station::new(PI);
    let text = b"NOW PLAYING: SON\r";
    let mut last = None;
    // 4 characters per 2A group; the final group carries the terminator.
    for seg in 0..5u16 {
        let start = seg as usize * 4;
        let get = |i: usize| text.get(i).copied().unwrap_or(b' ');
        let block3 = u16::from(get(start)) << 8 | u16::from(get(start + 1));
        let block4 = u16::from(get(start + 2)) << 8 | u16::from(get(start + 3));
        last = Some(station.update(&group([PI, block2(2, seg), block3, block4], 4)));
    }
    let record = last.unwrap();
    assert_eq!(str_value(&record, "radiotext"), "NOW PLAYING: SON");
    assert_eq!(station.radiotext(), "NOW PLAYING: SON");
}

#[test]
fn test_type2_ab_toggle_clears_text() {
    let mut station = Station::new(PI);
    let make = |seg: u16, ab: u16, c: &[u8; 4]| {
        group(
            [
                PI,
                block2(2, (ab << 4) | seg),
                u16::from(c[0]) << 8 | u16::from(c[1]),
                u16::from(c[2]) << 8 | u16::from(c[3]),
            ],
            4,
        )
    };

    // First text, toggle 0: "OLD\r"
    station.update(&make(0, 0, b"OLD\r"));
    assert_eq!(station.radiotext(), "OLD");

    // Toggle flips: buffer cleared, new text assembles from scratch and
    // contains only characters written after the flip.
    let record = station.update(&make(0, 1, b"NEW\r"));
    assert_eq!(str_value(&record, "radiotext"), "NEW");
    assert_eq!(station.radiotext(), "NEW");
}

#[test]
fn test_type2b_uses_two_char_segments() {
    let mut station = Station::new(PI);
    // Version B: two characters per group from block 4, written at
    // segment * 2 + 2.
    let record = station.update(&group(
        [PI, block2_b(2, 0), PI, u16::from(b'A') << 8 | u16::from(b'\r')],
        4,
    ));
    assert!(!record.contains("radiotext"), "text cannot complete from position 2");
    // The characters landed at positions 2..3; with positions 0..1 never
    // written there has been no completion and the snapshot is still blank.
    assert!(station.radiotext().trim().is_empty());
}

#[test]
fn test_type3_announces_oda() {
    let mut station = Station::new(PI);
    // Bind group 8A to the TMC application 0xCD46.
    let record = station.update(&group([PI, block2(3, 0b10000), 0x0012, 0xCD46], 4));
    match record.get("open_data_app") {
        Some(Value::Map(fields)) => {
            assert_eq!(fields[0], ("group".into(), Value::Str("8A".into())));
            assert_eq!(
                fields[1],
                ("app_name".into(), Value::Str("RDS-TMC: ALERT-C".into()))
            );
            assert_eq!(fields[2], ("message".into(), Value::Str("0x12".into())));
        }
        other => panic!("expected open_data_app map, got {:?}", other),
    }
}

#[test]
fn test_type8_tmc_envelope_after_binding() {
    let mut station = Station::new(PI);
    station.update(&group([PI, block2(3, 0b10000), 0x0012, 0xCD46], 4));

    let record = station.update(&group([PI, block2(8, 0b00101), 0x1234, 0x5678], 4));
    assert_eq!(str_value(&record, "tmc_message"), "0x0512345678");
}

#[test]
fn test_type8_without_binding_is_silent() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(8, 0), 0x1234, 0x5678], 4));
    assert!(!record.contains("tmc_message"));
}

#[test]
fn test_type8_non_tmc_binding_is_silent() {
    let mut station = Station::new(PI);
    // Bind 8A to RadioText+ instead of TMC.
    station.update(&group([PI, block2(3, 0b10000), 0x0012, 0x4BD7], 4));
    let record = station.update(&group([PI, block2(8, 0), 0x1234, 0x5678], 4));
    assert!(!record.contains("tmc_message"));
}

#[test]
fn test_type4_clock_time() {
    let mut station = Station::new(PI);
    // MJD 58849 = 2020-01-01, 12:30 UTC, offset +2 h.
    let mjd: u32 = 58849;
    let block2 = block2(4, (mjd >> 15) as u16);
    let block3 = (((mjd & 0x7FFF) as u16) << 1) | 0; // hour bit 4 = 0
    let block4 = (12 << 12) | (30 << 6) | 4; // hour 12, minute 30, +4 half-hours
    let record = station.update(&group([PI, block2, block3, block4], 4));
    assert_eq!(str_value(&record, "clock_time"), "2020-01-01T14:30:00+02:00");
    assert_eq!(station.clock_time(), "2020-01-01T14:30:00+02:00");
}

#[test]
fn test_type4_negative_offset() {
    let mut station = Station::new(PI);
    let mjd: u32 = 58849;
    let block2 = block2(4, (mjd >> 15) as u16);
    let block3 = ((mjd & 0x7FFF) as u16) << 1;
    // Hour 12, minute 00, offset -1 h (sign bit 5 set, 2 half-hours).
    // Truncating the offset-adjusted MJD pulls any negative offset onto the
    // previous day, as the annex G arithmetic does.
    let block4 = (12 << 12) | (0 << 6) | 0x20 | 2;
    let record = station.update(&group([PI, block2, block3, block4], 4));
    assert_eq!(str_value(&record, "clock_time"), "2019-12-31T11:00:00-01:00");
}

#[test]
fn test_type4_three_blocks_emit_nothing() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(4, 1), 0x4242, 0], 3));
    assert!(!record.contains("clock_time"));
}

#[test]
fn test_type4_version_b_ignored() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2_b(4, 1), 0x4242, 0x1234], 4));
    assert!(!record.contains("clock_time"));
}

#[test]
fn test_unknown_group_type_marks_todo() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(5, 0), 0, 0], 4));
    assert!(record.to_string().contains("/* TODO */"));
}

#[test]
fn test_type14_is_recognised_without_todo() {
    let mut station = Station::new(PI);
    let record = station.update(&group([PI, block2(14, 0), 0, 0x5678], 4));
    assert!(!record.to_string().contains("/* TODO */"));
}

#[test]
fn test_decoder_keeps_one_station_per_pi() {
    let mut decoder = RdsDecoder::new();
    decoder.update(&group([0x1111, block2(0, 0) | 0x0400, 0, 0], 2));
    decoder.update(&group([0x2222, block2(0, 0), 0, 0], 2));

    assert!(decoder.station(0x1111).unwrap().is_traffic_program());
    assert!(!decoder.station(0x2222).unwrap().is_traffic_program());
    assert!(decoder.station(0x3333).is_none());
}
