/// `148` -> `"2h 28m"`
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Whole US dollars with thousands separators; zero means unknown
pub fn format_currency(amount: u64) -> String {
    if amount == 0 {
        return "N/A".to_string();
    }
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${}", grouped)
}

/// One decimal place, like the rating badge on a card
pub fn format_rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}
