//! User-facing reply copy.

use crate::catalog::{ClassAdvice, SymptomAdvice};
use crate::classifier::ClassificationResult;

const GREETING: &str = "สวัสดีครับ คุณหมอ AI ยินดีให้บริการครับ! 👋\n\
    ส่งรูปภาพผิวหนังหรือบาดแผลมาให้ผมช่วยวิเคราะห์เบื้องต้นได้เลยนะครับ";
const ABOUT: &str = "ผมคือ AI สำหรับวิเคราะห์รูปภาพโรคผิวหนังและบาดแผลเบื้องต้นครับ\n\
    เพียงแค่ส่งรูปภาพเข้ามา ผมจะช่วยวิเคราะห์โรคของคุณจากภาพที่ส่งมา";
const THANKS: &str = "ยินดีครับ หากมีคำถามหรือต้องการให้ช่วยวิเคราะห์อีก ส่งรูปมาได้เลยนะครับ!";
const UNRECOGNIZED: &str = "ผมยังไม่เข้าใจคำถามครับ โปรดส่งรูปภาพเพื่อให้ผมช่วยวิเคราะห์เบื้องต้นครับ 😊";
const ASK_OTHER_SYMPTOMS: &str = "ขอบคุณสำหรับข้อมูลตำแหน่งครับ\n\
    มีอาการอื่นๆ ร่วมด้วยไหมครับ? (เช่น คัน, ปวด, มีไข้, บวมแดง, ผื่นขึ้น) หากไม่มีให้พิมพ์ 'ไม่มี' ครับ";
const RECORD_SAVED: &str = "ขอบคุณสำหรับข้อมูลครับ ข้อมูลของคุณถูกบันทึกไว้เพื่อเป็นประโยชน์ต่อไป\n\
    หากต้องการวิเคราะห์รูปภาพอีกครั้ง ส่งรูปมาได้เลยนะครับ!";
const MODEL_UNAVAILABLE: &str = "ขออภัยครับ โมเดล AI ยังไม่พร้อมให้บริการ โปรดแจ้งผู้ดูแลระบบ";
const ASK_LOCATION: &str = "**เพื่อบันทึกข้อมูลเพิ่มเติม:**\n\
    อาการนี้เกิดขึ้นที่ส่วนไหนของร่างกายครับ/คะ? (เช่น แขน, ขา, ใบหน้า, ลำตัว)";
const CONSULT_DOCTOR: &str = "เพื่อการวินิจฉัยที่ถูกต้องและแม่นยำที่สุด **โปรดปรึกษาแพทย์ผู้เชี่ยวชาญ** หรือผู้เชี่ยวชาญด้านสุขภาพ";

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Classification result plus advice, ending with the location question.
    Diagnosis { result: ClassificationResult, advice: ClassAdvice },
    SymptomAdvice(SymptomAdvice),
    Greeting,
    About,
    Thanks,
    Unrecognized,
    AskOtherSymptoms,
    RecordSaved,
    ModelUnavailable,
    ImageError { reason: String },
}

impl Reply {
    pub fn render(&self) -> String {
        match self {
            Reply::Diagnosis { result, advice } => format!(
                "จากการวิเคราะห์เบื้องต้น AI คาดการณ์ว่ารูปภาพนี้มีลักษณะคล้ายกับ:\n\
                 **{thai} ({english})**\n\
                 (ความมั่นใจ: {confidence:.2})\n\n\
                 **💡 วิธีรักษาเบื้องต้น:**\n{treatment}\n\n\
                 **🚫 สิ่งที่ควรหลีกเลี่ยง:**\n{avoid}\n\n\
                 **🚨 หากอาการรุนแรง/ผิดปกติ:**\n{severe}\n\n\
                 **⚠️ คำเตือนสำคัญ:**\n\
                 ข้อมูลนี้เป็นเพียงการวิเคราะห์เบื้องต้นจากระบบ AI และไม่สามารถใช้แทนการวินิจฉัยของแพทย์ได้\n\
                 {CONSULT_DOCTOR}\n\n{ASK_LOCATION}",
                thai = result.label.thai_name(),
                english = result.label.english_name(),
                confidence = result.confidence,
                treatment = advice.treatment,
                avoid = advice.avoid,
                severe = advice.severe_warning,
            ),
            Reply::SymptomAdvice(advice) => format!(
                "**💡 วิธีรักษาเบื้องต้นสำหรับอาการ{keyword}:**\n{treatment}\n\n\
                 **⚠️ คำเตือนสำคัญ:**\n{warning}\n\n\
                 ข้อมูลนี้เป็นเพียงคำแนะนำเบื้องต้นจากระบบ AI และไม่สามารถใช้แทนการวินิจฉัยของแพทย์ได้\n\
                 {CONSULT_DOCTOR}",
                keyword = advice.keyword,
                treatment = advice.treatment,
                warning = advice.warning,
            ),
            Reply::Greeting => GREETING.to_string(),
            Reply::About => ABOUT.to_string(),
            Reply::Thanks => THANKS.to_string(),
            Reply::Unrecognized => UNRECOGNIZED.to_string(),
            Reply::AskOtherSymptoms => ASK_OTHER_SYMPTOMS.to_string(),
            Reply::RecordSaved => RECORD_SAVED.to_string(),
            Reply::ModelUnavailable => MODEL_UNAVAILABLE.to_string(),
            Reply::ImageError { reason } => format!(
                "ขออภัยครับ เกิดข้อผิดพลาดในการประมวลผลรูปภาพ: {reason}\n\
                 โปรดลองอีกครั้งหรือส่งรูปภาพที่ชัดเจนขึ้น"
            ),
        }
    }
}
