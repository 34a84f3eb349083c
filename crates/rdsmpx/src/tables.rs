//! Lookup tables: character set, programme types, countries, languages and
//! the open-data application registry.

/// RDS basic character set (EN 50067 annex E), codes 0x80..0xBF.
const LCD_EXTENDED_LOW: [char; 64] = [
    'á', 'à', 'é', 'è', 'í', 'ì', 'ó', 'ò', 'ú', 'ù', 'Ñ', 'Ç', 'Ş', 'β', '¡', 'Ĳ', //
    'â', 'ä', 'ê', 'ë', 'î', 'ï', 'ô', 'ö', 'û', 'ü', 'ñ', 'ç', 'ş', 'ǧ', 'ı', 'ĳ', //
    'ª', 'α', '©', '‰', 'Ǧ', 'ě', 'ň', 'ő', 'π', '€', '£', '$', '←', '↑', '→', '↓', //
    'º', '¹', '²', '³', '±', 'İ', 'ń', 'ű', 'µ', '¿', '÷', '°', '¼', '½', '¾', '§',
];

/// RDS basic character set, codes 0xC0..0xFF.
const LCD_EXTENDED_HIGH: [char; 64] = [
    'Á', 'À', 'É', 'È', 'Í', 'Ì', 'Ó', 'Ò', 'Ú', 'Ù', 'Ř', 'Č', 'Š', 'Ž', 'Ð', 'Ŀ', //
    'Â', 'Ä', 'Ê', 'Ë', 'Î', 'Ï', 'Ô', 'Ö', 'Û', 'Ü', 'ř', 'č', 'š', 'ž', 'đ', 'ŀ', //
    'Ã', 'Å', 'Æ', 'Œ', 'ŷ', 'Ý', 'Õ', 'Ø', 'Þ', 'Ŋ', 'Ŕ', 'Ć', 'Ś', 'Ź', 'Ŧ', 'ð', //
    'ã', 'å', 'æ', 'œ', 'ŵ', 'ý', 'õ', 'ø', 'þ', 'ŋ', 'ŕ', 'ć', 'ś', 'ź', 'ŧ', ' ',
];

/// Map an RDS character code to a displayable character.
///
/// The 0x20..0x7E range coincides with ASCII apart from a few symbols;
/// control codes render as spaces.
pub fn lcd_char(code: u8) -> char {
    match code {
        0x24 => '¤',
        0x5E => '―',
        0x60 => '‖',
        0x7E => '¯',
        0x20..=0x7E => code as char,
        0x80..=0xBF => LCD_EXTENDED_LOW[(code - 0x80) as usize],
        0xC0..=0xFF => LCD_EXTENDED_HIGH[(code - 0xC0) as usize],
        _ => ' ',
    }
}

/// Programme type names (EN 50067 table 15).
const PTY_NAMES: [&str; 32] = [
    "No PTY",
    "News",
    "Current Affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Cultures",
    "Science",
    "Varied Speech",
    "Pop Music",
    "Rock Music",
    "Easy Listening",
    "Light Classics M",
    "Serious Classics",
    "Other Music",
    "Weather & Metr",
    "Finance",
    "Children's Progs",
    "Social Affairs",
    "Religion",
    "Phone In",
    "Travel & Touring",
    "Leisure & Hobby",
    "Jazz Music",
    "Country Music",
    "National Music",
    "Oldies Music",
    "Folk Music",
    "Documentary",
    "Alarm Test",
    "Alarm - Alarm !",
];

/// Name of a 5-bit programme type code.
pub fn pty_name(pty: u8) -> &'static str {
    PTY_NAMES.get(pty as usize).copied().unwrap_or("No PTY")
}

/// Country resolution (EN 50067 annex D): the PI country nibble is only
/// unique within an extended country code page. Pages 0xE0..0xE4 cover the
/// European broadcasting area.
const COUNTRIES_E0: [&str; 15] = [
    "de", "dz", "ad", "il", "it", "be", "ru", "ps", "al", "at", "hu", "mt", "de", "??", "eg",
];
const COUNTRIES_E1: [&str; 15] = [
    "gr", "cy", "sm", "ch", "jo", "fi", "lu", "bg", "dk", "gi", "iq", "gb", "ly", "ro", "fr",
];
const COUNTRIES_E2: [&str; 15] = [
    "ma", "cz", "pl", "va", "sk", "sy", "tn", "??", "li", "is", "mc", "lt", "yu", "es", "no",
];
const COUNTRIES_E3: [&str; 15] = [
    "me", "ie", "tr", "mk", "??", "??", "??", "nl", "lv", "lb", "az", "hr", "kz", "se", "by",
];
const COUNTRIES_E4: [&str; 15] = [
    "md", "ee", "kg", "??", "??", "ua", "??", "pt", "si", "am", "uz", "ge", "??", "tm", "ba",
];

/// Resolve an ISO country code from the PI country nibble and the extended
/// country code. Returns `"??"` when the pair is not in the tables.
pub fn country_string(pi: u16, ecc: u8) -> &'static str {
    let cc = (pi >> 12) as usize;
    if !(1..=15).contains(&cc) {
        return "??";
    }
    let page = match ecc {
        0xE0 => &COUNTRIES_E0,
        0xE1 => &COUNTRIES_E1,
        0xE2 => &COUNTRIES_E2,
        0xE3 => &COUNTRIES_E3,
        0xE4 => &COUNTRIES_E4,
        _ => return "??",
    };
    page[cc - 1]
}

/// Language identification (EN 50067 annex J).
const LANGUAGE_NAMES: [&str; 128] = [
    "Unknown",
    "Albanian",
    "Breton",
    "Catalan",
    "Croatian",
    "Welsh",
    "Czech",
    "Danish",
    "German",
    "English",
    "Spanish",
    "Esperanto",
    "Estonian",
    "Basque",
    "Faroese",
    "French",
    "Frisian",
    "Irish",
    "Gaelic",
    "Galician",
    "Icelandic",
    "Italian",
    "Lappish",
    "Latin",
    "Latvian",
    "Luxembourgian",
    "Lithuanian",
    "Hungarian",
    "Maltese",
    "Dutch",
    "Norwegian",
    "Occitan",
    "Polish",
    "Portuguese",
    "Romanian",
    "Romansh",
    "Serbian",
    "Slovak",
    "Slovene",
    "Finnish",
    "Swedish",
    "Turkish",
    "Flemish",
    "Walloon",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "Background",
    "",
    "",
    "",
    "",
    "Zulu",
    "Vietnamese",
    "Uzbek",
    "Urdu",
    "Ukrainian",
    "Thai",
    "Telugu",
    "Tatar",
    "Tamil",
    "Tadzhik",
    "Swahili",
    "SrananTongo",
    "Somali",
    "Sinhalese",
    "Shona",
    "Serbo-Croat",
    "Ruthenian",
    "Russian",
    "Quechua",
    "Pushtu",
    "Punjabi",
    "Persian",
    "Papamiento",
    "Oriya",
    "Nepali",
    "Ndebele",
    "Marathi",
    "Moldovian",
    "Malaysian",
    "Malagasay",
    "Macedonian",
    "Laotian",
    "Korean",
    "Khmer",
    "Kazakh",
    "Kannada",
    "Japanese",
    "Indonesian",
    "Hindi",
    "Hebrew",
    "Hausa",
    "Gurani",
    "Gujurati",
    "Greek",
    "Georgian",
    "Fulani",
    "Dari",
    "Churash",
    "Chinese",
    "Burmese",
    "Bulgarian",
    "Bengali",
    "Belorussian",
    "Bambora",
    "Azerbaijan",
    "Assamese",
    "Armenian",
    "Arabic",
    "Amharic",
];

/// Name of an 8-bit language identification code.
pub fn language_string(code: u8) -> &'static str {
    let name = LANGUAGE_NAMES
        .get(code as usize)
        .copied()
        .unwrap_or("Unknown");
    if name.is_empty() {
        "Unknown"
    } else {
        name
    }
}

/// Registered open-data applications, keyed by application identifier.
const ODA_APPS: [(u16, &str); 42] = [
    (0x0000, "None"),
    (0x0093, "Cross referencing DAB within RDS"),
    (0x0BCB, "Leisure & Practical Info for Drivers"),
    (0x0C24, "ELECTRABEL-DSM 7"),
    (0x0CC1, "Wireless Playground broadcast control signal"),
    (0x0D45, "RDS-TMC: ALERT-C / EN ISO 14819-1"),
    (0x125F, "I-FM-RDS for fixed and mobile devices"),
    (0x1C68, "ITIS In-vehicle data base"),
    (0x1DC2, "CITIBUS 4"),
    (0x1DC5, "Encrypted TTI using ALERT-Plus"),
    (0x4400, "RDS-Light"),
    (0x4AA1, "RASANT"),
    (0x4BD7, "RadioText+ (RT+)"),
    (0x4BD8, "RadioText Plus / RT+ for eRT"),
    (0x4C59, "CITIBUS 2"),
    (0x4D87, "Radio Commerce System (RCS)"),
    (0x50DD, "To warn people in case of disasters or emergency"),
    (0x5757, "Personal weather station"),
    (0x6363, "Hybradio RDS-Net"),
    (0x6365, "RDS2 - 9 bit AF lists ODA"),
    (0x6552, "Enhanced RadioText (eRT)"),
    (0x6A7A, "Warning receiver"),
    (0x7373, "Enhanced early warning system"),
    (0xA112, "NL Alert system"),
    (0xA911, "Data FM Selective Multipoint Messaging"),
    (0xABCF, "RF Power Monitoring"),
    (0xC350, "NRSC Song Title and Artist"),
    (0xC3A1, "Personal Radio Service"),
    (0xC3B0, "iTunes Tagging"),
    (0xC3C3, "NAVTEQ Traffic Plus"),
    (0xC4D4, "eEAS"),
    (0xC549, "Smart Grid Broadcast Channel"),
    (0xC563, "ID Logic"),
    (0xC6A7, "Veil Enabled Interactive Device"),
    (0xC737, "Utility Message Channel (UMC)"),
    (0xCB73, "CITIBUS 1"),
    (0xCC21, "CITIBUS 3"),
    (0xCD46, "RDS-TMC: ALERT-C"),
    (0xCD47, "RDS-TMC: ALERT-C"),
    (0xCE6B, "Encrypted TTI using ALERT-Plus"),
    (0xE123, "APS Gateway"),
    (0xE911, "EAS open protocol"),
];

/// Name of an open-data application identifier.
pub fn app_name(aid: u16) -> &'static str {
    ODA_APPS
        .iter()
        .find(|&&(id, _)| id == aid)
        .map(|&(_, name)| name)
        .unwrap_or("(Unknown ODA)")
}
