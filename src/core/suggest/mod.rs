//! "Did you mean" suggestions for field names a schema does not declare.

use strsim::levenshtein;

/// Shortest offered key that may be completed to a longer legal name.
const MIN_ABBREVIATION_LEN: usize = 4;

fn length_threshold(offered: &str) -> usize {
    if offered.chars().count() < 5 {
        3
    } else {
        5
    }
}

/// Propose the legal name closest to `offered`, if any is close enough.
///
/// Names whose length is within the threshold window (3 for keys shorter than 5 characters, 5
/// otherwise) are ranked by Levenshtein distance. A name that `offered` abbreviates
/// (`working_dir` for `working_directory`) is also a candidate regardless of length. When
/// `offered` is longer than a name, that name is only accepted if its distance is less than half
/// its length, so appended noise (`titleaaa`) does not resolve to a short name. Ties go to the
/// first name in iteration order.
pub fn suggest<'a, I>(known_names: I, offered: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let threshold = length_threshold(offered);
    let offered_len = offered.chars().count();

    let mut best: Option<(&str, usize)> = None;
    for name in known_names {
        if name == offered {
            continue;
        }
        let name_len = name.chars().count();
        let abbreviation = offered_len >= MIN_ABBREVIATION_LEN && name.starts_with(offered);
        if !abbreviation && name_len.abs_diff(offered_len) >= threshold {
            continue;
        }
        let distance = levenshtein(offered, name);
        if offered_len > name_len && distance * 2 >= name_len {
            continue;
        }
        if best.map_or(true, |(_, current)| distance < current) {
            best = Some((name, distance));
        }
    }

    if let Some((name, distance)) = best {
        tracing::trace!(offered, suggestion = name, distance, "field name suggestion");
    }
    best.map(|(name, _)| name.to_string())
}
