//! Odometer naming for generated functions.
//!
//! Names advance by incrementing their last letter; a trailing `z` rolls
//! over by appending a fresh `a` instead of wrapping, so the sequence from
//! `a` is `a, b, ..., z, za, zb, ..., zz, zza, ...`. Each name is longer
//! than, or shortlex-greater than, every name before it.

/// Returns the name following `name`.
///
/// `name` must consist of lowercase ASCII letters.
pub fn next_name(name: &str) -> String {
    let mut next = String::with_capacity(name.len() + 1);
    match name.as_bytes().last() {
        Some(&last) if last < b'z' => {
            next.push_str(&name[..name.len() - 1]);
            next.push((last + 1) as char);
        }
        _ => {
            next.push_str(name);
            next.push('a');
        }
    }
    next
}

/// An endless iterator over odometer names.
#[derive(Debug, Clone)]
pub struct NameOdometer {
    next: String,
}

impl NameOdometer {
    /// Starts the sequence at `base`, which is yielded first.
    pub fn new(base: impl Into<String>) -> Self {
        Self { next: base.into() }
    }
}

impl Iterator for NameOdometer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let following = next_name(&self.next);
        Some(std::mem::replace(&mut self.next, following))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_increment_last_letter() {
        assert_eq!(next_name("a"), "b");
        assert_eq!(next_name("y"), "z");
        assert_eq!(next_name("za"), "zb");
        assert_eq!(next_name("zzy"), "zzz");
    }

    #[test]
    fn test_rollover_extends() {
        assert_eq!(next_name("z"), "za");
        assert_eq!(next_name("zz"), "zza");
        assert_eq!(next_name("abz"), "abza");
    }

    #[test]
    fn test_sequence_from_a() {
        let names: Vec<String> = NameOdometer::new("a").take(29).collect();
        assert_eq!(names[0], "a");
        assert_eq!(names[25], "z");
        assert_eq!(names[26], "za");
        assert_eq!(names[27], "zb");
        assert_eq!(names[28], "zc");
    }

    #[test]
    fn test_sequence_crosses_second_rollover() {
        let names: Vec<String> = NameOdometer::new("a").take(53).collect();
        assert_eq!(names[51], "zz");
        assert_eq!(names[52], "zza");
    }
}
