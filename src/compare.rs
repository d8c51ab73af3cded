/// Decides pass/fail for one test case.
///
/// Outputs are equal iff they match after stripping trailing line endings
/// from each side. Nothing else is normalized: leading whitespace, internal
/// whitespace, and a trailing space before the final newline all stay
/// significant, and there is no case folding. The asymmetric trailing-only
/// trim is deliberate policy, not an approximation.
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim_end_matches(['\r', '\n']) == expected.trim_end_matches(['\r', '\n'])
}
