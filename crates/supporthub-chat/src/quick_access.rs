//! Quick-access categories mapped to canned queries.
//!
//! A flat lookup table, not dynamic dispatch; unknown labels are an
//! explicit error the adapter turns into a client-side failure.

pub const QUICK_ACCESS_CATEGORIES: [(&str, &str); 4] = [
    ("Admission Process", "What is the admission process at the university?"),
    ("Exam Schedule", "Tell me about the exam schedule at the university."),
    ("Fee Structure", "What is the fee structure at the university?"),
    ("Scholarship Info", "What scholarships are available at the university?"),
];

pub fn query_for_category(category: &str) -> anyhow::Result<&'static str> {
    QUICK_ACCESS_CATEGORIES
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, query)| *query)
        .ok_or_else(|| anyhow::anyhow!("unknown quick-access category: {category}"))
}
