//! Encodings available through `encoding_rs`

use encoding_rs::Encoding;

use crate::traits::EncodingSource;
use crate::types::EncodingInfo;

/// Labels probed to discover each encoding's aliases
const PROBE_LABELS: &[&str] = &[
    "utf8",
    "unicode-1-1-utf-8",
    "unicode11utf8",
    "ibm866",
    "866",
    "cp866",
    "csibm866",
    "latin1",
    "latin2",
    "latin3",
    "latin4",
    "latin5",
    "latin6",
    "l1",
    "iso8859-1",
    "iso8859-2",
    "iso8859-5",
    "iso8859-7",
    "iso8859-15",
    "cyrillic",
    "arabic",
    "greek",
    "hebrew",
    "koi",
    "koi8",
    "koi8-ru",
    "mac",
    "csmacintosh",
    "x-mac-roman",
    "x-mac-ukrainian",
    "dos-874",
    "tis-620",
    "iso-8859-11",
    "cp819",
    "cp1250",
    "cp1251",
    "cp1252",
    "cp1253",
    "cp1254",
    "cp1255",
    "cp1256",
    "cp1257",
    "cp1258",
    "x-cp1250",
    "x-cp1251",
    "x-cp1252",
    "ascii",
    "us-ascii",
    "ansi_x3.4-1968",
    "gb2312",
    "chinese",
    "x-gbk",
    "csgb2312",
    "big5-hkscs",
    "cn-big5",
    "x-x-big5",
    "x-euc-jp",
    "cseucpkdfmtjapanese",
    "csiso2022jp",
    "sjis",
    "ms_kanji",
    "ms932",
    "windows-31j",
    "x-sjis",
    "csshiftjis",
    "korean",
    "ks_c_5601-1987",
    "windows-949",
    "cseuckr",
    "utf-16",
    "ucs-2",
    "unicodefffe",
    "iso-2022-kr",
    "hz-gb-2312",
];

/// Every encoding `encoding_rs` knows about
fn all_encodings() -> [&'static Encoding; 40] {
    use encoding_rs::*;
    [
        UTF_8,
        IBM866,
        ISO_8859_2,
        ISO_8859_3,
        ISO_8859_4,
        ISO_8859_5,
        ISO_8859_6,
        ISO_8859_7,
        ISO_8859_8,
        ISO_8859_8_I,
        ISO_8859_10,
        ISO_8859_13,
        ISO_8859_14,
        ISO_8859_15,
        ISO_8859_16,
        KOI8_R,
        KOI8_U,
        MACINTOSH,
        WINDOWS_874,
        WINDOWS_1250,
        WINDOWS_1251,
        WINDOWS_1252,
        WINDOWS_1253,
        WINDOWS_1254,
        WINDOWS_1255,
        WINDOWS_1256,
        WINDOWS_1257,
        WINDOWS_1258,
        X_MAC_CYRILLIC,
        GBK,
        GB18030,
        BIG5,
        EUC_JP,
        ISO_2022_JP,
        SHIFT_JIS,
        EUC_KR,
        REPLACEMENT,
        UTF_16BE,
        UTF_16LE,
        X_USER_DEFINED,
    ]
}

/// [`EncodingSource`] backed by the WHATWG encodings of `encoding_rs`
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformEncodings;

impl PlatformEncodings {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn describe(encoding: &'static Encoding) -> EncodingInfo {
        let aliases = PROBE_LABELS
            .iter()
            .filter(|label| Encoding::for_label(label.as_bytes()) == Some(encoding))
            .map(|label| (*label).to_string())
            .collect();

        EncodingInfo {
            name: encoding.name().to_string(),
            display_name: encoding.name().to_string(),
            aliases,
            registered: !encoding.name().starts_with("x-"),
            // UTF-16 and the replacement encoding encode as UTF-8
            can_encode: encoding.output_encoding() == encoding,
        }
    }
}

impl EncodingSource for PlatformEncodings {
    fn scan(&self) -> Vec<EncodingInfo> {
        all_encodings().into_iter().map(Self::describe).collect()
    }
}
