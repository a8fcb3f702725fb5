use serde::Serialize;

/// A class category with the classes and subjects the entry form offers.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCategory {
    pub name: &'static str,
    pub classes: &'static [&'static str],
    pub subjects: &'static [&'static str],
}

pub const JUNIOR: ClassCategory = ClassCategory {
    name: "Junior",
    classes: &["JSS 1", "JSS 2", "JSS 3"],
    subjects: &[
        "English Studies",
        "Mathematics",
        "One Nigerian Language",
        "Intermediate Science",
        "Physical & Health Education",
        "Digital Technologies / Information Technology (ICT)",
        "Christian Religious Studies (CRS) / Islamic Studies (IS)",
        "Nigerian History",
        "Social and Citizenship Studies",
        "Cultural & Creative Arts (CCA)",
        "Business Studies or Trade Subject",
        "French (Optional)",
        "Arabic (Optional)",
    ],
};

pub const SENIOR: ClassCategory = ClassCategory {
    name: "Senior",
    classes: &["SS 1", "SS 2", "SS 3"],
    subjects: &[
        "English Language",
        "General Mathematics",
        "One Trade Subject",
        "Citizenship & Heritage Studies",
    ],
};

pub fn categories() -> [ClassCategory; 2] {
    [JUNIOR, SENIOR]
}

/// Exact match on the class label.
pub fn category_for_class(class: &str) -> Option<ClassCategory> {
    categories()
        .into_iter()
        .find(|c| c.classes.contains(&class))
}
