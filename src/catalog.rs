//! Static advice copy keyed by class label and by symptom keyword.

use crate::classifier::SkinCondition;

pub const NO_TREATMENT_INFO: &str = "ไม่มีข้อมูลวิธีรักษาเบื้องต้น";
pub const NO_AVOID_INFO: &str = "ไม่มีข้อมูลสิ่งที่ควรหลีกเลี่ยง";
pub const NO_SEVERE_WARNING_INFO: &str = "ไม่มีคำเตือนสำหรับอาการรุนแรง";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassAdvice {
    pub treatment: &'static str,
    pub avoid: &'static str,
    pub severe_warning: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomAdvice {
    pub keyword: &'static str,
    pub treatment: &'static str,
    pub warning: &'static str,
}

/// Optional fields so a partially filled table still renders.
#[derive(Debug, Clone, Copy)]
pub struct ClassAdviceEntry {
    pub label: SkinCondition,
    pub treatment: Option<&'static str>,
    pub avoid: Option<&'static str>,
    pub severe_warning: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct AdviceCatalog {
    classes: &'static [ClassAdviceEntry],
    symptoms: &'static [SymptomAdvice],
}

impl Default for AdviceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AdviceCatalog {
    pub fn new(classes: &'static [ClassAdviceEntry], symptoms: &'static [SymptomAdvice]) -> Self {
        Self { classes, symptoms }
    }

    pub fn builtin() -> Self {
        Self::new(CLASS_ADVICE, SYMPTOM_ADVICE)
    }

    /// Exact lookup by label; absent fields fall back to fixed "no information" copy.
    pub fn class_advice(&self, label: SkinCondition) -> ClassAdvice {
        let entry = self.classes.iter().find(|e| e.label == label);
        ClassAdvice {
            treatment: entry.and_then(|e| e.treatment).unwrap_or(NO_TREATMENT_INFO),
            avoid: entry.and_then(|e| e.avoid).unwrap_or(NO_AVOID_INFO),
            severe_warning: entry
                .and_then(|e| e.severe_warning)
                .unwrap_or(NO_SEVERE_WARNING_INFO),
        }
    }

    /// First keyword, in table order, that occurs as a substring of `text`.
    /// Case-sensitive.
    pub fn symptom_advice(&self, text: &str) -> Option<SymptomAdvice> {
        self.symptoms.iter().find(|s| text.contains(s.keyword)).copied()
    }
}

const fn class(
    label: SkinCondition,
    treatment: &'static str,
    avoid: &'static str,
    severe_warning: &'static str,
) -> ClassAdviceEntry {
    ClassAdviceEntry {
        label,
        treatment: Some(treatment),
        avoid: Some(avoid),
        severe_warning: Some(severe_warning),
    }
}

static CLASS_ADVICE: &[ClassAdviceEntry] = &[
    class(
        SkinCondition::Abrasions,
        "ทำความสะอาดแผลด้วยน้ำสะอาดและสบู่เบาๆ ทาครีมฆ่าเชื้อและปิดด้วยผ้าก๊อซ",
        "หลีกเลี่ยงการแกะเกาแผล และไม่ให้แผลโดนสิ่งสกปรก",
        "หากมีเลือดออกมาก แผลลึก มีหนอง บวมแดง หรือปวดมาก ควรพบแพทย์ทันที",
    ),
    class(
        SkinCondition::Acne,
        "ใช้ผลิตภัณฑ์ทำความสะอาดผิวหน้าสำหรับสิว ทายาแต้มสิวที่มีส่วนผสมของ Benzoyl Peroxide หรือ Salicylic Acid",
        "หลีกเลี่ยงการบีบสิว การใช้เครื่องสำอางที่อุดตันรูขุมขน และอาหารที่มีน้ำตาลสูง",
        "หากสิวอักเสบมาก เป็นสิวหัวช้าง หรือมีอาการปวดรุนแรง ควรปรึกษาแพทย์ผิวหนัง",
    ),
    class(
        SkinCondition::ActinicKeratosis,
        "ปรึกษาแพทย์ผิวหนังเพื่อการรักษา เช่น การจี้ด้วยความเย็น การใช้ยาเฉพาะที่ หรือการผ่าตัดเล็ก",
        "หลีกเลี่ยงการโดนแสงแดดจัดโดยตรง และควรทาครีมกันแดดเป็นประจำ",
        "หากรอยโรคมีการเปลี่ยนแปลงขนาด สี หรือมีเลือดออก ควรพบแพทย์โดยเร็วที่สุด เพราะอาจพัฒนาเป็นมะเร็งผิวหนังได้",
    ),
    class(
        SkinCondition::BasalCellCarcinoma,
        "ปรึกษาแพทย์ผิวหนังเพื่อการรักษา เช่น การผ่าตัด การฉายรังสี หรือการใช้ยาเฉพาะที่",
        "หลีกเลี่ยงการโดนแสงแดดจัด และควรตรวจผิวหนังเป็นประจำ",
        "เป็นมะเร็งผิวหนังที่ต้องได้รับการรักษาโดยแพทย์ผู้เชี่ยวชาญทันที",
    ),
    class(
        SkinCondition::Bruises,
        "ประคบเย็นในช่วง 24-48 ชั่วโมงแรก จากนั้นประคบอุ่นเพื่อช่วยให้เลือดไหลเวียนดีขึ้น",
        "หลีกเลี่ยงการนวดหรือกดบริเวณที่ช้ำแรงๆ ในช่วงแรก",
        "หากรอยช้ำใหญ่ขึ้นอย่างรวดเร็ว ปวดมากผิดปกติ หรือเกิดจากการบาดเจ็บรุนแรง ควรพบแพทย์",
    ),
    class(
        SkinCondition::Burns,
        "แผลไหม้ระดับ 1-2: ล้างด้วยน้ำสะอาดหรือน้ำเกลือ ประคบเย็น ทายาสำหรับแผลไหม้",
        "ห้ามใช้ยาสีฟัน น้ำปลา หรือน้ำแข็งประคบแผลไหม้",
        "แผลไหม้ระดับ 3 ขึ้นไป แผลใหญ่ มีตุ่มพองขนาดใหญ่ หรือไหม้บริเวณใบหน้า มือ เท้า อวัยวะเพศ ควรพบแพทย์ทันที",
    ),
    class(
        SkinCondition::Cut,
        "ทำความสะอาดแผลด้วยน้ำสะอาดและสบู่ ทาครีมฆ่าเชื้อ ปิดด้วยผ้าก๊อซหรือพลาสเตอร์",
        "หลีกเลี่ยงการให้แผลโดนน้ำสกปรก และการแกะเกา",
        "หากแผลลึก เลือดออกไม่หยุด มีหนอง หรือปวดมาก ควรพบแพทย์เพื่อเย็บแผลหรือรับการรักษา",
    ),
    class(
        SkinCondition::Dermatofibroma,
        "โดยทั่วไปไม่จำเป็นต้องรักษา หากต้องการเอาออกเพื่อความสวยงาม สามารถปรึกษาแพทย์เพื่อผ่าตัดเล็กได้",
        "หลีกเลี่ยงการแกะเกาบ่อยๆ",
        "หากมีการเปลี่ยนแปลงขนาด สี หรือมีอาการเจ็บปวด ควรปรึกษาแพทย์เพื่อตรวจวินิจฉัยเพิ่มเติม",
    ),
    class(
        SkinCondition::DiabeticWounds,
        "ทำความสะอาดแผลอย่างสม่ำเสมอ ควบคุมระดับน้ำตาลในเลือด และปรึกษาแพทย์เพื่อการดูแลแผลที่เหมาะสม",
        "หลีกเลี่ยงการเดินเท้าเปล่า และการใส่รองเท้าที่ไม่เหมาะสม",
        "แผลเบาหวานมักหายยากและเสี่ยงต่อการติดเชื้อสูง ควรพบแพทย์ผู้เชี่ยวชาญทันที",
    ),
    class(
        SkinCondition::Laceration,
        "ทำความสะอาดแผล ห้ามเลือด และปรึกษาแพทย์เพื่อประเมินว่าต้องเย็บแผลหรือไม่",
        "หลีกเลี่ยงการสัมผัสแผลด้วยมือที่ไม่สะอาด",
        "หากแผลลึก กว้าง เลือดออกมาก หรือมีสิ่งแปลกปลอมติดอยู่ในแผล ควรพบแพทย์ทันที",
    ),
    class(
        SkinCondition::MelanocyticNevi,
        "โดยทั่วไปไม่จำเป็นต้องรักษา แต่ควรสังเกตการเปลี่ยนแปลง",
        "หลีกเลี่ยงการแกะเกาไฝ และควรทาครีมกันแดด",
        "หากไฝมีการเปลี่ยนแปลงขนาด รูปร่าง สี ขอบไม่เรียบ มีอาการคัน หรือมีเลือดออก ควรปรึกษาแพทย์ผิวหนังทันที (อาจเป็นสัญญาณของมะเร็งผิวหนัง)",
    ),
    class(
        SkinCondition::Melanoma,
        "ต้องได้รับการรักษาโดยแพทย์ผู้เชี่ยวชาญทันที เช่น การผ่าตัด การฉายรังสี หรือเคมีบำบัด",
        "หลีกเลี่ยงการโดนแสงแดดจัด และควรตรวจผิวหนังเป็นประจำ",
        "เป็นมะเร็งผิวหนังชนิดร้ายแรงที่สุด ต้องได้รับการวินิจฉัยและรักษาโดยแพทย์ผู้เชี่ยวชาญโดยเร็วที่สุด",
    ),
    class(
        SkinCondition::Normal,
        "ดูแลผิวพรรณให้สะอาด ชุ่มชื้น และทาครีมกันแดดเป็นประจำ",
        "ไม่มีข้อควรหลีกเลี่ยงเฉพาะเจาะจง แต่ควรดูแลสุขภาพโดยรวม",
        "หากมีอาการผิดปกติใดๆ เกิดขึ้น ควรปรึกษาแพทย์",
    ),
    class(
        SkinCondition::PressureWounds,
        "ลดแรงกดทับบริเวณแผล พลิกตัวบ่อยๆ ทำความสะอาดแผล และปรึกษาแพทย์เพื่อการดูแลแผลที่เหมาะสม",
        "หลีกเลี่ยงการนอนหรือนั่งท่าเดิมเป็นเวลานาน",
        "หากแผลลึก มีการติดเชื้อ หรือมีไข้ ควรพบแพทย์ทันที",
    ),
    class(
        SkinCondition::SeborrheicKeratoses,
        "โดยทั่วไปไม่จำเป็นต้องรักษา หากต้องการเอาออกเพื่อความสวยงาม สามารถปรึกษาแพทย์เพื่อจี้ด้วยความเย็นหรือเลเซอร์ได้",
        "ไม่มีข้อควรหลีกเลี่ยงเฉพาะเจาะจง",
        "หากมีการเปลี่ยนแปลงขนาด สี หรือมีอาการคัน/เจ็บปวด ควรปรึกษาแพทย์เพื่อตรวจวินิจฉัยเพิ่มเติม",
    ),
    class(
        SkinCondition::SquamousCellCarcinoma,
        "ปรึกษาแพทย์ผิวหนังเพื่อการรักษา เช่น การผ่าตัด การฉายรังสี หรือการใช้ยาเฉพาะที่",
        "หลีกเลี่ยงการโดนแสงแดดจัด และควรตรวจผิวหนังเป็นประจำ",
        "เป็นมะเร็งผิวหนังที่ต้องได้รับการรักษาโดยแพทย์ผู้เชี่ยวชาญทันที",
    ),
    class(
        SkinCondition::SurgicalWounds,
        "ทำความสะอาดแผลตามคำแนะนำของแพทย์ เปลี่ยนผ้าปิดแผลตามกำหนด และสังเกตอาการติดเชื้อ",
        "หลีกเลี่ยงการให้แผลโดนน้ำโดยไม่จำเป็น และการยกของหนัก",
        "หากแผลบวมแดงร้อน มีหนอง มีไข้ หรือปวดมาก ควรพบแพทย์ทันที",
    ),
    class(
        SkinCondition::VascularLesion,
        "ปรึกษาแพทย์ผิวหนังเพื่อการวินิจฉัยและวางแผนการรักษา เช่น เลเซอร์ การผ่าตัด หรือการฉีดสารบางชนิด",
        "หลีกเลี่ยงการแกะเกาหรือทำให้เกิดการบาดเจ็บ",
        "หากมีการเปลี่ยนแปลงขนาด สี หรือมีเลือดออก ควรปรึกษาแพทย์",
    ),
    class(
        SkinCondition::VenousWounds,
        "ทำความสะอาดแผล พันผ้ายืดหรือใส่ถุงน่องรัด เพื่อช่วยการไหลเวียนของเลือด และปรึกษาแพทย์เพื่อการดูแลแผลที่เหมาะสม",
        "หลีกเลี่ยงการยืนหรือนั่งห้อยขานานๆ",
        "หากแผลมีการติดเชื้อ บวมแดงร้อน หรือมีไข้ ควรพบแพทย์ทันที",
    ),
];

static SYMPTOM_ADVICE: &[SymptomAdvice] = &[
    SymptomAdvice {
        keyword: "ปวดหัว",
        treatment: "พักผ่อนให้เพียงพอ ดื่มน้ำมากๆ และอาจรับประทานยาแก้ปวดพื้นฐาน เช่น พาราเซตามอล",
        warning: "หากปวดหัวรุนแรงขึ้นเรื่อยๆ มีไข้สูง คอแข็ง หรือมีอาการผิดปกติอื่นๆ ควรรีบพบแพทย์",
    },
    SymptomAdvice {
        keyword: "ปวดท้อง",
        treatment: "ดื่มน้ำอุ่น พักผ่อน และหลีกเลี่ยงอาหารรสจัดหรือย่อยยาก",
        warning: "หากปวดท้องรุนแรง ปวดบิด มีไข้ คลื่นไส้อาเจียน หรือถ่ายเป็นเลือด ควรรีบพบแพทย์",
    },
    SymptomAdvice {
        keyword: "เจ็บคอ",
        treatment: "ดื่มน้ำอุ่น กลั้วคอด้วยน้ำเกลือ พักผ่อนให้เพียงพอ และหลีกเลี่ยงอาหารรสจัด",
        warning: "หากเจ็บคอมากจนกลืนลำบาก มีไข้สูง หายใจลำบาก หรือมีหนองในลำคอ ควรรีบพบแพทย์",
    },
    SymptomAdvice {
        keyword: "เป็นไข้",
        treatment: "เช็ดตัวลดไข้ ดื่มน้ำมากๆ พักผ่อน และรับประทานยาลดไข้ เช่น พาราเซตามอล",
        warning: "หากไข้สูงไม่ลด มีผื่นขึ้น หายใจลำบาก หรือมีอาการชัก ควรรีบพบแพทย์",
    },
    SymptomAdvice {
        keyword: "ไอ",
        treatment: "ดื่มน้ำอุ่นมากๆ จิบน้ำผึ้งผสมมะนาว หรือใช้ยาแก้ไอตามอาการ",
        warning: "หากไอเรื้อรัง ไอมีเสมหะปนเลือด หายใจลำบาก หรือมีไข้สูง ควรรีบพบแพทย์",
    },
    SymptomAdvice {
        keyword: "ท้องเสีย",
        treatment: "ดื่มน้ำเกลือแร่ (ORS) เพื่อชดเชยน้ำและเกลือแร่ที่สูญเสียไป และรับประทานอาหารอ่อนๆ",
        warning: "หากท้องเสียรุนแรง ถ่ายเป็นน้ำจำนวนมาก มีไข้สูง ปวดท้องมาก หรือมีอาการขาดน้ำ ควรรีบพบแพทย์",
    },
];
