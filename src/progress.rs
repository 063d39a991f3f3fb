use indicatif::{ProgressBar, ProgressStyle};

/// Bar sized for `len` steps, in the `[elapsed] bar pos/len (percent%)` style.
#[must_use]
pub fn bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(style(len));
    pb
}

/// Sets a new length and widens the counters to fit it.
pub fn resize(pb: &ProgressBar, len: u64) {
    pb.set_length(len);
    pb.set_style(style(len));
}

fn style(len: u64) -> ProgressStyle {
    let t = digits(len);
    ProgressStyle::with_template(&format!(
        "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos:>{t}}}/{{len:{t}}} ({{percent}}%) {{msg}}"
    ))
    .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("##-"))
}

const fn digits(mut n: u64) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_of_length() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(12_345), 5);
    }

    #[test]
    fn bar_has_requested_length() {
        let pb = bar(42);
        assert_eq!(pb.length(), Some(42));
    }

    #[test]
    fn resize_updates_length() {
        let pb = bar(0);
        resize(&pb, 1500);
        assert_eq!(pb.length(), Some(1500));
    }
}
