//! Prompt construction for the advice endpoint.
//!
//! One builder, three variants (initial advice, affordable check, shortfall
//! check). Product definitions, the contact block and the formatting rules
//! each exist exactly once in this file.

use crate::advice::calculation::{
    Assessment, LoanProduct, STANDARD_HOME_MAX_AGE, STANDARD_HOME_MAX_AMOUNT, STANDARD_HOME_MIN_AGE,
};
use crate::advice::models::{AdviceRequest, RequestType};

/// Applicants younger than this get the informal persona.
pub const INFORMAL_PERSONA_MAX_AGE: u32 = 35;

pub const PERSONA_INFORMAL: &str = "Bạn là Em Duy CVKH - một chuyên gia tư vấn tài chính từ Sacombank, \
với phong cách Gen Z, hài hước và vui tính. Hãy bắt đầu lời chào thật \"cháy\" và \"keo lỳ\", \
sau đó đi vào phân tích. Luôn gọi người dùng là \"Anh/Chị\".";

pub const PERSONA_FORMAL: &str = "Bạn là Em Duy - Chuyên gia tư vấn tài chính Sacombank. \
Hãy trả lời một cách chuyên nghiệp, nghiêm túc và rõ ràng. \
Bắt đầu bằng lời chào trang trọng và luôn gọi người dùng là \"Anh/Chị\".";

/// Must appear verbatim at the end of every generated answer.
pub const CONTACT_BLOCK: &str = "\
> **Để được tư vấn chi tiết và chính xác nhất, Anh/Chị vui lòng liên hệ trực tiếp với Em Duy tại Sacombank Hà Thành - Số 25+27 Cửa Bắc, phường Trúc Bạch, quận Ba Đình, Hà Nội hoặc qua số điện thoại 0944 443 179.**
> **Ngoài ra, Anh/Chị có thể điền thông tin vào Form đăng ký tư vấn bên dưới để được kết nối trực tiếp với Em Duy - Chuyên gia tư vấn tài chính Sacombank nhé!**";

const CONTACT_SECTION_TEMPLATE: &str = "\
### Thông tin liên hệ (BẮT BUỘC):
* Luôn kết thúc bài tư vấn bằng phần thông tin liên hệ chính xác như sau, không được chỉnh sửa:
{contact_block}";

const FORMAT_SECTION: &str = "\
### Định dạng:
* Sử dụng tiếng Việt.
* Dùng Markdown để định dạng câu trả lời (tiêu đề, danh sách, in đậm) cho dễ đọc.";

const INITIAL_TASK: &str = "Nhiệm vụ của bạn là phân tích thông tin khách hàng và hai gói vay dưới đây \
để đưa ra đề xuất phù hợp, kèm bảng tính tham khảo và phân tích khả năng trả nợ.";

const CHECK_TASK: &str = "Nhiệm vụ của bạn là đánh giá khả năng trả nợ của khách hàng dựa trên \
kết quả tính toán đã được hệ thống xác định sẵn bên dưới. Không tự tính lại các con số này.";

const APPLICANT_TEMPLATE: &str = "\
### Thông tin người dùng:
* **Tuổi:** {age}
* **Thu nhập hàng tháng:** {income} VND
* **Số tiền muốn vay:** {loan_amount} VND
* **Thời hạn vay:** {loan_term} năm";

const FIGURES_TEMPLATE: &str = "\
### Kết quả tính toán của hệ thống:
* **Gói vay phù hợp:** {product}
* **Lãi suất ưu đãi áp dụng:** {rate}
* **Tiền gốc hàng tháng:** {principal} VND
* **Tiền lãi tháng đầu tiên:** {interest} VND
* **Tổng tiền trả tháng 1:** {payment} VND";

const INITIAL_ANALYSIS_TEMPLATE: &str = "\
### Yêu cầu đầu ra:
1.  **Phân tích & Đề xuất:**
    * Dựa vào tuổi và nhu cầu vay, hãy xác định gói vay phù hợp.
    * Nếu tuổi từ {min_age}-{max_age} và số tiền vay <= {ceiling}, hãy đề xuất gói **{standard}**.
    * Nếu tuổi ngoài khoảng {min_age}-{max_age} hoặc số tiền vay > {ceiling}, hãy đề xuất gói **{premium}**.
    * Giải thích ngắn gọn, súc tích lý do bạn đề xuất gói vay đó.

2.  **Phân tích khả năng trả nợ:**
    * Dựa trên gói vay được đề xuất, tính tổng số tiền trả tháng đầu tiên.
    * Tổng tiền trả tháng 1 = (Số tiền vay / (Thời hạn vay * 12)) + (Số tiền vay * (Lãi suất năm của gói vay / 12)).
    * So sánh `Thu nhập hàng tháng` ({income}) với `Tổng tiền trả tháng 1`.
    * Nếu thu nhập lớn hơn hoặc bằng tổng tiền trả tháng 1, hãy nhận xét là \"thu nhập của Anh/Chị về cơ bản đủ để chi trả khoản vay\".
    * Nếu thu nhập nhỏ hơn, hãy nhận xét là \"thu nhập hiện tại có thể chưa đủ, Anh/Chị nên cân nhắc giảm số tiền vay hoặc kéo dài thời hạn để giảm áp lực tài chính\".
    * Kết quả của bạn phải khớp với phần \"Kết quả tính toán của hệ thống\" ở trên.

3.  **Ước tính trả nợ:**
    * Dựa vào gói vay đã đề xuất, hãy tính toán số tiền trả góp hàng tháng (gốc + lãi) và trình bày dưới dạng bảng cho 3 tháng đầu tiên.
    * Sử dụng công thức tính lãi suất theo dư nợ giảm dần.

4.  **Lưu ý quan trọng:**
    * Thêm một phần lưu ý rõ ràng rằng đây chỉ là ước tính sơ bộ và lãi suất có thể thay đổi.";

const AFFORDABLE_ANALYSIS_TEMPLATE: &str = "\
### Yêu cầu đầu ra:
1.  **Kết luận khả năng trả nợ:**
    * Thu nhập hàng tháng ({income} VND) lớn hơn hoặc bằng tổng tiền trả tháng 1 ({payment} VND), còn dư {surplus} VND.
    * Hãy nhận xét rằng \"thu nhập của Anh/Chị về cơ bản đủ để chi trả khoản vay\".
    * Nhắc Anh/Chị dự phòng chi phí sinh hoạt và khả năng lãi suất tăng sau 12 tháng ưu đãi.

2.  **Giới thiệu gói vay {product}:**
    * Giải thích ngắn gọn vì sao gói **{product}** phù hợp với Anh/Chị.

3.  **Bước tiếp theo:**
    * Liệt kê ngắn gọn các giấy tờ cần chuẩn bị để nộp hồ sơ vay.

4.  **Lưu ý quan trọng:**
    * Thêm một phần lưu ý rõ ràng rằng đây chỉ là ước tính sơ bộ và lãi suất có thể thay đổi.";

const SHORTFALL_ANALYSIS_TEMPLATE: &str = "\
### Yêu cầu đầu ra:
1.  **Kết luận khả năng trả nợ:**
    * Thu nhập hàng tháng ({income} VND) nhỏ hơn tổng tiền trả tháng 1 ({payment} VND), thiếu khoảng {shortfall} VND.
    * Hãy nhận xét rằng \"thu nhập hiện tại có thể chưa đủ, Anh/Chị nên cân nhắc giảm số tiền vay hoặc kéo dài thời hạn để giảm áp lực tài chính\".

2.  **Phương án điều chỉnh:**
    * Gợi ý cụ thể: giảm số tiền vay, kéo dài thời hạn vay, hoặc bổ sung người đồng trả nợ.
    * Trình bày nhẹ nhàng, tích cực, không làm Anh/Chị mất hứng thú.

3.  **Giới thiệu gói vay {product}:**
    * Giải thích ngắn gọn điều kiện của gói **{product}** đối với trường hợp của Anh/Chị.

4.  **Lưu ý quan trọng:**
    * Thêm một phần lưu ý rõ ràng rằng đây chỉ là ước tính sơ bộ và lãi suất có thể thay đổi.";

/// Which analysis instructions a prompt carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisVariant {
    InitialAdvice,
    Affordable,
    Shortfall,
}

impl AnalysisVariant {
    pub fn select(request_type: RequestType, assessment: &Assessment) -> Self {
        match request_type {
            RequestType::InitialAdvice => AnalysisVariant::InitialAdvice,
            RequestType::FinancialCheck if assessment.affordable => AnalysisVariant::Affordable,
            RequestType::FinancialCheck => AnalysisVariant::Shortfall,
        }
    }
}

/// Everything the builder needs. Figures come from `calculation::assess`.
#[derive(Debug, Clone, Copy)]
pub struct PromptParams<'a> {
    pub request: &'a AdviceRequest,
    pub assessment: &'a Assessment,
}

impl PromptParams<'_> {
    pub fn variant(&self) -> AnalysisVariant {
        AnalysisVariant::select(self.request.request_type, self.assessment)
    }
}

pub fn persona_for_age(age: u32) -> &'static str {
    if age < INFORMAL_PERSONA_MAX_AGE {
        PERSONA_INFORMAL
    } else {
        PERSONA_FORMAL
    }
}

pub fn build_prompt(params: &PromptParams<'_>) -> String {
    let request = params.request;
    let assessment = params.assessment;
    let estimate = &assessment.estimate;
    let variant = params.variant();

    let task = match variant {
        AnalysisVariant::InitialAdvice => INITIAL_TASK,
        AnalysisVariant::Affordable | AnalysisVariant::Shortfall => CHECK_TASK,
    };

    let applicant = fill(
        APPLICANT_TEMPLATE,
        &[
            ("age", request.age.to_string()),
            ("income", format_vnd(request.income)),
            ("loan_amount", format_vnd(request.loan_amount)),
            ("loan_term", request.loan_term.to_string()),
        ],
    );

    let figures = fill(
        FIGURES_TEMPLATE,
        &[
            ("product", assessment.product.display_name().to_string()),
            ("rate", format_rate(assessment.product.annual_rate_promo())),
            ("principal", format_vnd(estimate.principal_per_month)),
            ("interest", format_vnd(estimate.interest_month_1)),
            ("payment", format_vnd(estimate.first_month_payment)),
        ],
    );

    let analysis = match variant {
        AnalysisVariant::InitialAdvice => fill(
            INITIAL_ANALYSIS_TEMPLATE,
            &[
                ("min_age", STANDARD_HOME_MIN_AGE.to_string()),
                ("max_age", STANDARD_HOME_MAX_AGE.to_string()),
                ("ceiling", format_vnd(STANDARD_HOME_MAX_AMOUNT)),
                ("standard", LoanProduct::StandardHome.display_name().to_string()),
                ("premium", LoanProduct::PremiumHome.display_name().to_string()),
                ("income", format_vnd(request.income)),
            ],
        ),
        AnalysisVariant::Affordable => fill(
            AFFORDABLE_ANALYSIS_TEMPLATE,
            &[
                ("income", format_vnd(request.income)),
                ("payment", format_vnd(estimate.first_month_payment)),
                ("surplus", format_vnd(request.income - estimate.first_month_payment)),
                ("product", assessment.product.display_name().to_string()),
            ],
        ),
        AnalysisVariant::Shortfall => fill(
            SHORTFALL_ANALYSIS_TEMPLATE,
            &[
                ("income", format_vnd(request.income)),
                ("payment", format_vnd(estimate.first_month_payment)),
                ("shortfall", format_vnd(assessment.shortfall(request.income))),
                ("product", assessment.product.display_name().to_string()),
            ],
        ),
    };

    let contact = fill(
        CONTACT_SECTION_TEMPLATE,
        &[("contact_block", CONTACT_BLOCK.to_string())],
    );

    [
        persona_for_age(request.age).to_string(),
        task.to_string(),
        products_section(),
        applicant,
        figures,
        analysis,
        contact,
        FORMAT_SECTION.to_string(),
    ]
    .join("\n\n")
}

/// Both product definitions, rendered from `LoanProduct`.
fn products_section() -> String {
    let mut out = String::from("### Thông tin hai gói vay:");
    for (i, product) in LoanProduct::ALL.iter().enumerate() {
        let max_amount = match product.max_amount() {
            Some(amount) => format!("{} VND", format_vnd(amount)),
            None => "Không giới hạn".to_string(),
        };
        out.push_str(&format!(
            "\n{}.  **{} ({}):**\n    * **Đối tượng:** {}.\n    * **Mức vay tối đa:** {}.\n    * **Lãi suất ưu đãi 12 tháng đầu:** {}.",
            i + 1,
            product.display_name(),
            product.tagline(),
            product.audience(),
            max_amount,
            format_rate(product.annual_rate_promo()),
        ));
    }
    out
}

/// Replaces every `{key}` in `template`.
fn fill(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Whole-VND amount with Vietnamese digit grouping: 20000000 -> "20.000.000".
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// 0.065 -> "6.5%/năm"
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%/năm", rate * 100.0)
}
