//! Map step and field names back to source lines for human-facing diagnostics.
//!
//! This is a text heuristic, not a structural parse: it looks for `name:` substrings line by line.

/// Return the 1-based line for `key` (inside `step_name` when given), or 0 when nothing matches.
///
/// With a step name, the first line containing `<step_name>:` is the anchor; the key is then
/// searched from just after that match onwards, so flow mappings on the anchor line count. The
/// anchor line is returned if the key never appears. Without a step name the key is searched in
/// the whole text.
pub fn locate(raw_text: &str, step_name: Option<&str>, key: Option<&str>) -> usize {
    let mut lines = raw_text.lines().enumerate();

    let mut best = 0;
    let mut anchor_rest = None;
    if let Some(step) = step_name {
        let needle = format!("{}:", step);
        let anchor = lines
            .by_ref()
            .find_map(|(index, line)| line.find(&needle).map(|at| (index, &line[at + needle.len()..])));
        match anchor {
            Some((index, rest)) => {
                best = index + 1;
                anchor_rest = Some(rest);
            }
            None => return 0,
        }
    }

    if let Some(key) = key {
        let needle = format!("{}:", key);
        if anchor_rest.is_some_and(|rest| rest.contains(&needle)) {
            return best;
        }
        if let Some((index, _)) = lines.find(|(_, line)| line.contains(&needle)) {
            return index + 1;
        }
    }

    best
}
