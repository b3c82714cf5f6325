//! Release filename parsing.
//!
//! Filenames follow the scene conventions used in the source channel, e.g.
//! `Example.Movie.2021.1080p.WEB-DL.Hindi.mkv` or `Show.Name.S01E03.720p.mkv`.
//! Parsing works on a copy of the stem where `.` and `_` are spaces; the title
//! is everything before the first structural marker.

use super::models::{ParseError, ParsedRelease, ReleaseKind, DEFAULT_QUALITY};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref EXTENSION: Regex =
        Regex::new(r"(?i)\.(mkv|mp4|avi|mov|wmv|flv|webm|m4v|mpe?g|m2ts|ts)$").unwrap();
    static ref EPISODE_MARKER: Regex =
        Regex::new(r"(?i)\bS(\d{1,2})[\s-]*EP?(\d{1,3})\b").unwrap();
    static ref CROSS_EPISODE_MARKER: Regex = Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})\b").unwrap();
    static ref SEASON_MARKER: Regex =
        Regex::new(r"(?i)\b(?:S|Season[\s-]*)(\d{1,2})\b").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap();
    static ref RESOLUTION: Regex = Regex::new(r"(?i)\b(480|576|720|1080|1440|2160)p\b").unwrap();
    static ref UHD: Regex = Regex::new(r"(?i)\b(4k|uhd)\b").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}").unwrap();
    static ref NOISE: Regex = Regex::new(&format!(r"(?i)\b(?:{})\b", NOISE_TOKENS.join("|"))).unwrap();
    static ref TOKEN_SPLIT: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}

/// Source, codec, audio and release tags. Each entry is a regex fragment matched as a whole word.
const NOISE_TOKENS: &[&str] = &[
    r"web[- ]?dl",
    r"web[- ]?rip",
    r"blu[- ]?ray",
    r"br[- ]?rip",
    r"bd[- ]?rip",
    r"hd[- ]?rip",
    r"dvd[- ]?rip",
    r"dvdscr",
    r"hdtv",
    r"hdcam",
    r"hdts",
    r"cam[- ]?rip",
    r"pre[- ]?dvd",
    r"[xh] ?26[45]",
    r"hevc",
    r"xvid",
    r"aac(?: ?2 ?0)?",
    r"e?ac3",
    r"ddp?(?: ?[257] ?[01])?",
    r"dts(?:[- ]?hd)?",
    r"atmos",
    r"truehd",
    r"10 ?bit",
    r"hdr(?:10)?",
    r"remux",
    r"proper",
    r"repack",
    r"extended",
    r"uncut",
    r"unrated",
    r"imax",
    r"dual[- ]audio",
    r"multi(?:[- ]audio)?",
    r"[em]subs?",
    r"nf",
    r"amzn",
    r"dsnp",
    r"hmax",
    r"zee5",
    r"hotstar",
];

/// Full language names. These may also be stripped from the end of a title.
const LANGUAGES: &[(&str, &str)] = &[
    ("hindi", "Hindi"),
    ("english", "English"),
    ("tamil", "Tamil"),
    ("telugu", "Telugu"),
    ("malayalam", "Malayalam"),
    ("kannada", "Kannada"),
    ("bengali", "Bengali"),
    ("bangla", "Bengali"),
    ("marathi", "Marathi"),
    ("punjabi", "Punjabi"),
    ("gujarati", "Gujarati"),
    ("urdu", "Urdu"),
    ("korean", "Korean"),
    ("japanese", "Japanese"),
    ("chinese", "Chinese"),
    ("spanish", "Spanish"),
    ("french", "French"),
    ("german", "German"),
    ("italian", "Italian"),
    ("russian", "Russian"),
    ("arabic", "Arabic"),
];

/// Abbreviations, only recognised outside the title.
const LANGUAGE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("hin", "Hindi"),
    ("eng", "English"),
    ("tam", "Tamil"),
    ("tel", "Telugu"),
    ("mal", "Malayalam"),
    ("kan", "Kannada"),
    ("ben", "Bengali"),
    ("kor", "Korean"),
    ("jap", "Japanese"),
    ("jpn", "Japanese"),
    ("chi", "Chinese"),
    ("spa", "Spanish"),
    ("fre", "French"),
    ("ger", "German"),
    ("ita", "Italian"),
    ("rus", "Russian"),
];

fn language_name(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    LANGUAGES
        .iter()
        .chain(LANGUAGE_ABBREVIATIONS)
        .find(|(key, _)| *key == lower)
        .map(|(_, name)| *name)
}

fn full_language_name(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    LANGUAGES
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, name)| *name)
}

/// The year of a release: the last 4-digit year that is not the very first token.
fn find_year(s: &str) -> Option<regex::Match<'_>> {
    YEAR.find_iter(s)
        .filter(|m| !s[..m.start()].trim().is_empty())
        .last()
}

fn find_season_episode(spaced: &str) -> (Option<u32>, Option<u32>) {
    let captures = EPISODE_MARKER
        .captures(spaced)
        .or_else(|| CROSS_EPISODE_MARKER.captures(spaced));
    if let Some(caps) = captures {
        let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let episode = caps.get(2).and_then(|m| m.as_str().parse().ok());
        if season.is_some() && episode.is_some() {
            return (season, episode);
        }
    }
    let season = SEASON_MARKER
        .captures(spaced)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());
    (season, None)
}

fn find_quality(spaced: &str) -> String {
    if let Some(caps) = RESOLUTION.captures(spaced) {
        return format!("{}p", &caps[1]);
    }
    if UHD.is_match(spaced) {
        return "2160p".to_string();
    }
    DEFAULT_QUALITY.to_string()
}

/// Byte offset of the first structural marker in `s`, or its length.
fn title_cutoff(s: &str) -> usize {
    let markers = [
        EPISODE_MARKER.find(s),
        CROSS_EPISODE_MARKER.find(s),
        SEASON_MARKER.find(s),
        find_year(s),
        RESOLUTION.find(s),
        UHD.find(s),
        NOISE.find(s),
    ];
    markers
        .iter()
        .flatten()
        .map(|m| m.start())
        .min()
        .unwrap_or(s.len())
}

/// Parse a release filename into its structured parts.
pub fn parse_filename(filename: &str) -> Result<ParsedRelease, ParseError> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(ParseError::Empty);
    }

    let stem = EXTENSION.replace(filename, "");
    let spaced = stem.replace(['.', '_'], " ");

    let (season, episode) = find_season_episode(&spaced);
    let kind = match (season, episode) {
        (Some(_), Some(_)) => ReleaseKind::SeriesEpisode,
        (Some(_), None) => ReleaseKind::SeriesPack,
        _ => ReleaseKind::Movie,
    };
    let quality = find_quality(&spaced);

    let bracket_groups: Vec<&str> = BRACKETED.find_iter(&spaced).map(|m| m.as_str()).collect();
    let unbracketed = BRACKETED.replace_all(&spaced, " ");

    let year = find_year(&unbracketed)
        .map(|m| m.as_str())
        .or_else(|| {
            bracket_groups
                .iter()
                .find_map(|group| YEAR.find(group).map(|m| m.as_str()))
        })
        .and_then(|y| y.parse::<u16>().ok());

    let cutoff = title_cutoff(&unbracketed);
    let title_region = NOISE.replace_all(&unbracketed[..cutoff], " ");
    let mut title_words: Vec<&str> = title_region
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '-' || c == '+'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut trailing_languages = Vec::new();
    while title_words.len() > 1 {
        match title_words.last().and_then(|w| full_language_name(w)) {
            Some(name) => {
                trailing_languages.push(name);
                title_words.pop();
            }
            None => break,
        }
    }

    let title = title_words.join(" ");
    if title.is_empty() {
        return Err(ParseError::NoTitle(filename.to_string()));
    }

    let mut languages: BTreeSet<String> =
        trailing_languages.into_iter().map(str::to_string).collect();
    let remainder = std::iter::once(&unbracketed[cutoff..]).chain(bracket_groups.iter().copied());
    for part in remainder {
        for token in TOKEN_SPLIT.split(part) {
            if let Some(name) = language_name(token) {
                languages.insert(name.to_string());
            }
        }
    }

    Ok(ParsedRelease {
        title,
        year,
        kind,
        season,
        episode,
        quality,
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movie_release() {
        let parsed = parse_filename("Example.Movie.2021.1080p.WEB-DL.mkv").unwrap();
        assert_eq!(parsed.title, "Example Movie");
        assert_eq!(parsed.year, Some(2021));
        assert_eq!(parsed.kind, ReleaseKind::Movie);
        assert_eq!(parsed.quality, "1080p");
        assert_eq!(parsed.season, None);
        assert_eq!(parsed.episode, None);
    }

    #[test]
    fn parses_single_episode() {
        let parsed = parse_filename("Show.Name.S01E03.720p.mkv").unwrap();
        assert_eq!(parsed.title, "Show Name");
        assert_eq!(parsed.kind, ReleaseKind::SeriesEpisode);
        assert_eq!(parsed.season, Some(1));
        assert_eq!(parsed.episode, Some(3));
        assert_eq!(parsed.quality, "720p");
    }

    #[test]
    fn episode_marker_variants() {
        for name in [
            "Show Name S02 E11 1080p.mp4",
            "Show_Name_S02E11_1080p.mkv",
            "Show.Name.2x11.HDTV.avi",
        ] {
            let parsed = parse_filename(name).unwrap();
            assert_eq!(parsed.kind, ReleaseKind::SeriesEpisode, "{}", name);
            assert_eq!(parsed.title, "Show Name", "{}", name);
            assert_eq!((parsed.season, parsed.episode), (Some(2), Some(11)), "{}", name);
        }
    }

    #[test]
    fn season_marker_without_episode_is_pack() {
        let parsed = parse_filename("Show.Name.S02.1080p.WEB-DL.mkv").unwrap();
        assert_eq!(parsed.kind, ReleaseKind::SeriesPack);
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.episode, None);
        assert_eq!(parsed.title, "Show Name");

        let parsed = parse_filename("Show Name Season 3 Complete 720p.mkv").unwrap();
        assert_eq!(parsed.kind, ReleaseKind::SeriesPack);
        assert_eq!(parsed.season, Some(3));
    }

    #[test]
    fn missing_quality_defaults_to_hd() {
        let parsed = parse_filename("Some Movie 2019.mkv").unwrap();
        assert_eq!(parsed.quality, DEFAULT_QUALITY);
        assert_eq!(parsed.year, Some(2019));
    }

    #[test]
    fn uhd_tokens_map_to_2160p() {
        assert_eq!(parse_filename("Movie.2020.4K.HDR.mkv").unwrap().quality, "2160p");
        assert_eq!(parse_filename("Movie.2020.2160P.mkv").unwrap().quality, "2160p");
    }

    #[test]
    fn numeric_titles_survive() {
        let parsed = parse_filename("1917.2019.1080p.BluRay.x264.mkv").unwrap();
        assert_eq!(parsed.title, "1917");
        assert_eq!(parsed.year, Some(2019));

        let parsed = parse_filename("2012.mkv").unwrap();
        assert_eq!(parsed.title, "2012");
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn year_inside_title_is_kept() {
        let parsed = parse_filename("Blade.Runner.2049.2017.720p.mkv").unwrap();
        assert_eq!(parsed.title, "Blade Runner 2049");
        assert_eq!(parsed.year, Some(2017));
    }

    #[test]
    fn bracketed_groups_are_stripped() {
        let parsed = parse_filename("[TeamX] Example Movie (2021) [Hindi + English] 720p.mkv").unwrap();
        assert_eq!(parsed.title, "Example Movie");
        assert_eq!(parsed.year, Some(2021));
        assert_eq!(parsed.quality, "720p");
        assert_eq!(
            parsed.languages,
            BTreeSet::from(["English".to_string(), "Hindi".to_string()])
        );
    }

    #[test]
    fn collects_languages_after_title() {
        let parsed = parse_filename("Example.Movie.2021.Hin-Eng.1080p.mkv").unwrap();
        assert_eq!(
            parsed.languages,
            BTreeSet::from(["English".to_string(), "Hindi".to_string()])
        );

        let parsed = parse_filename("Example.Movie.Tamil.720p.mkv").unwrap();
        assert_eq!(parsed.title, "Example Movie");
        assert!(parsed.languages.contains("Tamil"));
    }

    #[test]
    fn language_words_in_title_are_not_languages() {
        let parsed = parse_filename("English.Vinglish.2012.720p.mkv").unwrap();
        assert_eq!(parsed.title, "English Vinglish");
        assert!(parsed.languages.is_empty());
    }

    #[test]
    fn rejects_names_without_title() {
        assert_eq!(parse_filename("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse_filename("S01E03.720p.mkv"),
            Err(ParseError::NoTitle(_))
        ));
        assert!(matches!(
            parse_filename("1080p.WEB-DL.mkv"),
            Err(ParseError::NoTitle(_))
        ));
    }
}
