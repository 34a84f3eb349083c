//! Per-station RDS group semantics.
//!
//! A [`Station`] accumulates everything learned about one programme service
//! (identified by its PI code) and turns each received group into an output
//! [`Record`]. The [`RdsDecoder`] owns one station per observed PI.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::groups::{bits, Group, GroupType, Version};
use crate::rdstext::RdsString;
use crate::record::{Record, Value};
use crate::tables;

/// Radio paging fields carried by type-1 slow labelling codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PagerInfo {
    /// Transmitter network group, 0 when no paging service.
    pub tng: u8,
    pub interval: u8,
    pub opc: u8,
    pub pac: u8,
    pub ecc: u8,
    pub ccf: u8,
}

/// Everything known about one programme service.
pub struct Station {
    pi: u16,
    ecc: u8,
    cc: u8,
    lang: u8,
    is_tp: bool,
    is_ta: bool,
    is_music: bool,
    pty: u8,
    ps: RdsString,
    radiotext: RdsString,
    rt_ab: Option<bool>,
    /// Alternative frequencies in 10 kHz units (8750 = 87.5 MHz).
    alt_freqs: BTreeSet<u16>,
    num_alt_freqs: usize,
    pin: u16,
    linkage_la: bool,
    has_country: bool,
    pager: PagerInfo,
    tmc_id: u16,
    ews_channel: u16,
    clock_time: String,
    oda_app_for_group: HashMap<GroupType, u16>,
}

impl Station {
    pub fn new(pi: u16) -> Self {
        Station {
            pi,
            ecc: 0,
            cc: 0,
            lang: 0,
            is_tp: false,
            is_ta: false,
            is_music: false,
            pty: 0,
            ps: RdsString::new(8),
            radiotext: RdsString::new(64),
            rt_ab: None,
            alt_freqs: BTreeSet::new(),
            num_alt_freqs: 0,
            pin: 0,
            linkage_la: false,
            has_country: false,
            pager: PagerInfo::default(),
            tmc_id: 0,
            ews_channel: 0,
            clock_time: String::new(),
            oda_app_for_group: HashMap::new(),
        }
    }

    pub fn pi(&self) -> u16 {
        self.pi
    }

    pub fn program_type(&self) -> u8 {
        self.pty
    }

    pub fn is_traffic_program(&self) -> bool {
        self.is_tp
    }

    pub fn is_music(&self) -> bool {
        self.is_music
    }

    pub fn has_ps(&self) -> bool {
        self.ps.is_complete()
    }

    /// Programme service name at its last completion.
    pub fn ps(&self) -> &str {
        self.ps.last_complete()
    }

    /// Radiotext at its last completion.
    pub fn radiotext(&self) -> &str {
        self.radiotext.last_complete()
    }

    /// Country resolved from the PI country nibble and the extended country
    /// code, once a type-1 variant-0 group has been seen.
    pub fn country(&self) -> Option<&'static str> {
        self.has_country
            .then(|| tables::country_string(self.pi, self.ecc))
    }

    pub fn language(&self) -> &'static str {
        tables::language_string(self.lang)
    }

    pub fn program_item_number(&self) -> u16 {
        self.pin
    }

    /// Country nibble from the PI code, as confirmed by type-1 groups.
    pub fn country_code(&self) -> u8 {
        self.cc
    }

    pub fn has_linkage(&self) -> bool {
        self.linkage_la
    }

    pub fn pager(&self) -> &PagerInfo {
        &self.pager
    }

    pub fn clock_time(&self) -> &str {
        &self.clock_time
    }

    /// Decode one group addressed to this station.
    pub fn update(&mut self, group: &Group) -> Record {
        self.is_tp = bits(group.block2, 10, 1) != 0;
        self.pty = bits(group.block2, 5, 5) as u8;

        let mut record = Record::new();
        record.push_str("pi", format!("0x{:04x}", self.pi));
        record.push_str("group", group.ty.to_string());
        record.push_bool("tp", self.is_tp);
        record.push_str("prog_type", tables::pty_name(self.pty));

        match group.ty.num {
            0 => self.decode_type0(group, &mut record),
            1 => self.decode_type1(group, &mut record),
            2 => self.decode_type2(group, &mut record),
            3 => self.decode_type3(group, &mut record),
            4 => self.decode_type4(group, &mut record),
            8 => self.decode_type8(group, &mut record),
            14 => self.decode_type14(group, &mut record),
            _ => {
                trace!(group = %group.ty, "group type not implemented");
                record.mark_todo();
            }
        }
        record
    }

    /// Register one alternative-frequency code (EN 50067 section 3.2.1.6).
    fn add_alt_freq(&mut self, code: u8) {
        match code {
            // VHF channel: 87.5 MHz + code * 100 kHz, kept in 10 kHz units.
            1..=204 => {
                self.alt_freqs.insert(8750 + u16::from(code) * 10);
            }
            // 205: filler, 224: no AF exists, 250: an AM/LF frequency
            // follows; none carry a frequency here.
            205 | 224 | 250 => {}
            // 225..249 announce the number of frequencies to follow.
            225..=249 => self.num_alt_freqs = usize::from(code - 224),
            _ => {}
        }
    }

    /// Basic tuning and switching.
    fn decode_type0(&mut self, group: &Group, record: &mut Record) {
        self.is_ta = bits(group.block2, 4, 1) != 0;
        self.is_music = bits(group.block2, 3, 1) != 0;
        record.push_bool("ta", self.is_ta);

        if group.num_blocks < 3 {
            return;
        }

        if group.ty.version == Version::A {
            self.add_alt_freq(bits(group.block3, 8, 8) as u8);
            self.add_alt_freq(bits(group.block3, 0, 8) as u8);

            if !self.alt_freqs.is_empty() && self.alt_freqs.len() == self.num_alt_freqs {
                let freqs = self
                    .alt_freqs
                    .iter()
                    .map(|&f| f64::from(f) / 100.0)
                    .collect();
                record.push("alt_freqs", Value::Freqs(freqs));
                self.alt_freqs.clear();
            }
        }

        if group.num_blocks < 4 {
            return;
        }

        let pos = usize::from(bits(group.block2, 0, 2)) * 2;
        self.update_ps(
            pos,
            [bits(group.block4, 8, 8) as u8, bits(group.block4, 0, 8) as u8],
            record,
        );
    }

    fn update_ps(&mut self, pos: usize, chars: [u8; 2], record: &mut Record) {
        for (i, &c) in chars.iter().enumerate() {
            self.ps.set_at(pos + i, c);
        }
        if self.ps.is_complete() {
            record.push_str("ps", self.ps.last_complete());
        }
    }

    /// Programme item number and slow labelling codes.
    fn decode_type1(&mut self, group: &Group, record: &mut Record) {
        if group.num_blocks < 4 {
            return;
        }

        self.pin = group.block4;

        if group.ty.version != Version::A {
            return;
        }

        self.pager.tng = bits(group.block2, 2, 3) as u8;
        if self.pager.tng != 0 {
            self.pager.interval = bits(group.block2, 0, 2) as u8;
        }
        self.linkage_la = bits(group.block3, 15, 1) != 0;

        let slc_variant = bits(group.block3, 12, 3);
        match slc_variant {
            0 => {
                if self.pager.tng != 0 {
                    self.pager.opc = bits(group.block3, 8, 4) as u8;
                }
                self.decode_pager_pinless(group.block4);

                self.ecc = bits(group.block3, 0, 8) as u8;
                self.cc = bits(group.block1, 12, 4) as u8;
                if self.ecc != 0 {
                    self.has_country = true;
                    record.push_str("country", tables::country_string(self.pi, self.ecc));
                }
            }
            1 => {
                self.tmc_id = bits(group.block3, 0, 12);
                record.push_str("tmc_id", format!("0x{:03x}", self.tmc_id));
            }
            2 => {
                if self.pager.tng != 0 {
                    self.pager.pac = bits(group.block3, 0, 6) as u8;
                    self.pager.opc = bits(group.block3, 8, 4) as u8;
                }
                self.decode_pager_pinless(group.block4);
            }
            3 => {
                self.lang = bits(group.block3, 0, 8) as u8;
                record.push_str("language", tables::language_string(self.lang));
            }
            6 => {
                // Broadcaster data, not decoded.
                trace!(data = group.block3 & 0xFFF, "broadcaster data");
            }
            7 => {
                self.ews_channel = bits(group.block3, 0, 12);
                record.push_str("ews", format!("0x{:03x}", self.ews_channel));
            }
            _ => {}
        }
    }

    /// Paging sub-record carried in block 4 when the PIN field is absent
    /// (EN 50067 section M.3.2.4.3).
    fn decode_pager_pinless(&mut self, block4: u16) {
        if block4 >> 11 != 0 || self.pager.tng == 0 {
            return;
        }
        match bits(block4, 10, 1) {
            0 => {
                self.pager.pac = bits(block4, 4, 6) as u8;
                self.pager.opc = bits(block4, 0, 4) as u8;
            }
            _ => match bits(block4, 8, 2) {
                0 => self.pager.ecc = bits(block4, 0, 6) as u8,
                3 => self.pager.ccf = bits(block4, 0, 4) as u8,
                _ => {}
            },
        }
    }

    /// Radiotext.
    fn decode_type2(&mut self, group: &Group, record: &mut Record) {
        if group.num_blocks < 3 {
            return;
        }

        let segment = usize::from(bits(group.block2, 0, 4));
        let rt_position = segment * if group.ty.version == Version::A { 4 } else { 2 };

        // A flipped A/B bit announces a new text; the old one is discarded.
        let new_ab = bits(group.block2, 4, 1) != 0;
        if let Some(prev) = self.rt_ab {
            if prev != new_ab {
                self.radiotext.clear();
            }
        }
        self.rt_ab = Some(new_ab);

        if group.ty.version == Version::A {
            self.update_radiotext(
                rt_position,
                [bits(group.block3, 8, 8) as u8, bits(group.block3, 0, 8) as u8],
                record,
            );
        }
        if group.num_blocks == 4 {
            self.update_radiotext(
                rt_position + 2,
                [bits(group.block4, 8, 8) as u8, bits(group.block4, 0, 8) as u8],
                record,
            );
        }
    }

    fn update_radiotext(&mut self, pos: usize, chars: [u8; 2], record: &mut Record) {
        for (i, &c) in chars.iter().enumerate() {
            self.radiotext.set_at(pos + i, c);
        }
        if self.radiotext.is_complete() {
            record.push_str("radiotext", self.radiotext.last_complete());
        }
    }

    /// Open-data application announcement.
    fn decode_type3(&mut self, group: &Group, record: &mut Record) {
        if group.num_blocks < 4 || group.ty.version != Version::A {
            return;
        }

        let oda_group = GroupType::from_code(bits(group.block2, 0, 5));
        let oda_msg = group.block3;
        let oda_aid = group.block4;

        self.oda_app_for_group.insert(oda_group, oda_aid);
        debug!(group = %oda_group, aid = format_args!("0x{:04x}", oda_aid), "open data application registered");

        record.push(
            "open_data_app",
            Value::Map(vec![
                ("group".into(), Value::Str(oda_group.to_string())),
                ("app_name".into(), Value::Str(tables::app_name(oda_aid).into())),
                ("message".into(), Value::Str(format!("0x{:02x}", oda_msg))),
            ]),
        );
    }

    /// Clock-time and date.
    fn decode_type4(&mut self, group: &Group, record: &mut Record) {
        if group.num_blocks < 3 || group.ty.version == Version::B {
            return;
        }

        let mut mjd = i32::from(bits(group.block2, 0, 2)) * 32768 + i32::from(bits(group.block3, 1, 15));
        let lto = if group.num_blocks == 4 {
            let sign = if bits(group.block4, 5, 1) != 0 { -1.0 } else { 1.0 };
            let lto = sign * f64::from(bits(group.block4, 0, 5)) / 2.0;
            mjd = (f64::from(mjd) + lto / 24.0) as i32;
            lto
        } else {
            0.0
        };

        // Modified Julian Date to calendar date (EN 50067 annex G).
        let mut year = ((f64::from(mjd) - 15078.2) / 365.25) as i32;
        let mut month =
            ((f64::from(mjd) - 14956.1 - (f64::from(year) * 365.25).trunc()) / 30.6001) as i32;
        let day = mjd
            - 14956
            - (f64::from(year) * 365.25) as i32
            - (f64::from(month) * 30.6001) as i32;
        if month == 14 || month == 15 {
            year += 1;
            month -= 12;
        }
        year += 1900;
        month -= 1;

        if group.num_blocks == 4 {
            let offset_minutes = ((lto - lto.trunc()) * 60.0) as i32;

            // The hour field spans the word boundary: its top bit is block 3
            // bit 0, the remaining four are block 4 bits 15..12.
            let hour_utc = (bits(group.block3, 0, 1) << 4) + bits(group.block4, 12, 4);
            let hour = (f64::from(hour_utc) + lto) as i32 % 24;
            let minute = i32::from(bits(group.block4, 6, 6)) + offset_minutes;

            self.clock_time = format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:00{}{:02}:{:02}",
                year,
                month,
                day,
                hour,
                minute,
                if lto < 0.0 { '-' } else { '+' },
                lto.trunc().abs() as i32,
                offset_minutes.abs(),
            );
            record.push_str("clock_time", self.clock_time.clone());
        }
    }

    /// Open-data payload: only the TMC envelope is recognised here; the
    /// ALERT-C payload itself is handed off for downstream parsing.
    fn decode_type8(&mut self, group: &Group, record: &mut Record) {
        let Some(&aid) = self.oda_app_for_group.get(&group.ty) else {
            return;
        };
        if aid == 0xCD46 || aid == 0xCD47 {
            record.push_str(
                "tmc_message",
                format!(
                    "0x{:02x}{:04x}{:04x}",
                    bits(group.block2, 0, 5),
                    group.block3,
                    group.block4
                ),
            );
        }
    }

    /// Enhanced Other Networks: recognised but not decoded.
    fn decode_type14(&mut self, group: &Group, _record: &mut Record) {
        trace!(on_pi = format_args!("0x{:04x}", group.block4), "enhanced other networks group");
    }
}

/// Stateful decoder mapping each observed PI code to its [`Station`].
#[derive(Default)]
pub struct RdsDecoder {
    stations: HashMap<u16, Station>,
}

impl RdsDecoder {
    pub fn new() -> Self {
        RdsDecoder::default()
    }

    /// Route a group to its station, creating it on first observation.
    pub fn update(&mut self, group: &Group) -> Record {
        debug!(pi = format_args!("0x{:04x}", group.pi()), group = %group.ty, "group received");
        let station = self
            .stations
            .entry(group.pi())
            .or_insert_with(|| Station::new(group.pi()));
        station.update(group)
    }

    pub fn station(&self, pi: u16) -> Option<&Station> {
        self.stations.get(&pi)
    }
}

#[cfg(test)]
#[path = "station_tests.rs"]
mod tests;
