/// Counts how many keywords appear in `name`, ignoring case.
///
/// Each keyword contributes at most one point no matter how often it occurs in
/// the name; repeating a keyword in the list counts it again.
pub fn score<S: AsRef<str>>(name: &str, keywords: &[S]) -> u32 {
    let name = name.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| name.contains(&keyword.as_ref().to_lowercase()))
        .count() as u32
}
