use std::fmt;

/// Number of categories the model emits, in output order.
pub const LABEL_COUNT: usize = 19;

/// The closed set of skin conditions the classifier can report.
///
/// Variant order is the model's output order; `SkinCondition::ALL[i]` is the
/// label for score index `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SkinCondition {
    Abrasions,
    Acne,
    ActinicKeratosis,
    BasalCellCarcinoma,
    Bruises,
    Burns,
    Cut,
    Dermatofibroma,
    DiabeticWounds,
    Laceration,
    MelanocyticNevi,
    Melanoma,
    Normal,
    PressureWounds,
    SeborrheicKeratoses,
    SquamousCellCarcinoma,
    SurgicalWounds,
    VascularLesion,
    VenousWounds,
}

impl SkinCondition {
    pub const ALL: [SkinCondition; LABEL_COUNT] = [
        SkinCondition::Abrasions,
        SkinCondition::Acne,
        SkinCondition::ActinicKeratosis,
        SkinCondition::BasalCellCarcinoma,
        SkinCondition::Bruises,
        SkinCondition::Burns,
        SkinCondition::Cut,
        SkinCondition::Dermatofibroma,
        SkinCondition::DiabeticWounds,
        SkinCondition::Laceration,
        SkinCondition::MelanocyticNevi,
        SkinCondition::Melanoma,
        SkinCondition::Normal,
        SkinCondition::PressureWounds,
        SkinCondition::SeborrheicKeratoses,
        SkinCondition::SquamousCellCarcinoma,
        SkinCondition::SurgicalWounds,
        SkinCondition::VascularLesion,
        SkinCondition::VenousWounds,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// English class name, as used in training and persisted records.
    pub fn english_name(&self) -> &'static str {
        match self {
            SkinCondition::Abrasions => "Abrasions",
            SkinCondition::Acne => "Acne",
            SkinCondition::ActinicKeratosis => "Actinic Keratosis",
            SkinCondition::BasalCellCarcinoma => "Basal Cell Carcinoma",
            SkinCondition::Bruises => "Bruises",
            SkinCondition::Burns => "Burns",
            SkinCondition::Cut => "Cut",
            SkinCondition::Dermatofibroma => "Dermatofibroma",
            SkinCondition::DiabeticWounds => "Diabetic Wounds",
            SkinCondition::Laceration => "Laceration",
            SkinCondition::MelanocyticNevi => "Melanocytic Nevi",
            SkinCondition::Melanoma => "Melanoma",
            SkinCondition::Normal => "Normal",
            SkinCondition::PressureWounds => "Pressure Wounds",
            SkinCondition::SeborrheicKeratoses => "Seborrheic Keratoses",
            SkinCondition::SquamousCellCarcinoma => "Squamous Cell Carcinoma",
            SkinCondition::SurgicalWounds => "Surgical Wounds",
            SkinCondition::VascularLesion => "Vascular Lesion",
            SkinCondition::VenousWounds => "Venous Wounds",
        }
    }

    pub fn thai_name(&self) -> &'static str {
        match self {
            SkinCondition::Abrasions => "แผลถลอก",
            SkinCondition::Acne => "สิว",
            SkinCondition::ActinicKeratosis => "ติ่งเนื้อจากแสงแดด",
            SkinCondition::BasalCellCarcinoma => "มะเร็งผิวหนังชนิดเบเซลเซลล์",
            SkinCondition::Bruises => "รอยฟกช้ำ",
            SkinCondition::Burns => "แผลไหม้",
            SkinCondition::Cut => "บาดแผลถูกของมีคม",
            SkinCondition::Dermatofibroma => "เนื้องอกผิวหนังชนิดเดอร์มาโตไฟโบรมา",
            SkinCondition::DiabeticWounds => "แผลเบาหวาน",
            SkinCondition::Laceration => "แผลฉีกขาด",
            SkinCondition::MelanocyticNevi => "ไฝ",
            SkinCondition::Melanoma => "มะเร็งผิวหนังชนิดเมลาโนมา",
            SkinCondition::Normal => "ผิวปกติ",
            SkinCondition::PressureWounds => "แผลกดทับ",
            SkinCondition::SeborrheicKeratoses => "กระเนื้อ",
            SkinCondition::SquamousCellCarcinoma => "มะเร็งผิวหนังชนิดสความัสเซลล์",
            SkinCondition::SurgicalWounds => "แผลผ่าตัด",
            SkinCondition::VascularLesion => "รอยโรคเส้นเลือด",
            SkinCondition::VenousWounds => "แผลหลอดเลือดดำบกพร่อง",
        }
    }
}

impl fmt::Display for SkinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}

impl From<SkinCondition> for &'static str {
    fn from(condition: SkinCondition) -> Self {
        condition.english_name()
    }
}

impl TryFrom<String> for SkinCondition {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        SkinCondition::ALL
            .into_iter()
            .find(|c| c.english_name() == s)
            .ok_or_else(|| format!("Unknown skin condition: {s}"))
    }
}
