//! Instruction prompt sent with each completion request.
//!
//! The prompt is deterministic: the same document text and buyer hint
//! always produce the same request.

use fapiao_gateway::{ChatMessage, ChatRequest, ResponseFormat};

use crate::models::record::{InvoiceField, NOT_AVAILABLE};

/// Closed vocabulary the model must pick the category from.
pub const CATEGORIES: [&str; 13] = [
    "餐饮服务",
    "住宿服务",
    "交通运输服务",
    "居民日常服务",
    "办公用品",
    "电子设备",
    "咨询服务",
    "技术服务",
    "租赁服务",
    "建筑服务",
    "医疗服务",
    "教育服务",
    "商品零售",
];

/// System instruction.
pub const SYSTEM_PROMPT: &str = "你是一个专业的发票数据提取机器人。请根据用户提供的发票文本内容，准确抽取关键信息，并只以JSON对象的形式返回。";

/// Worked examples in report layout, one per common invoice type.
const EXAMPLE_ROWS: [&str; 2] = [
    ",24442000000657111111,91440812MAD2B8BJX7,湛江市西海岸西厨餐饮管理有限公司,91111111MA9W511111,广州咖喱网络科技有限公司,2024年12月30日,*餐饮服务*餐饮服务,1,109.9,1%,1.1,111,电子发票（普通发票）,餐饮服务",
    "044002301111,45311111,9144000061740323XQ,百胜餐饮（广东）有限公司,91111111MA9W511111,广州咖喱网络科技有限公司,2024年12月30日,*餐饮服务*餐饮服务,1,177.28,6%,10.64,187.92,增值税电子普通发票,餐饮服务",
];

/// JSON schema example listing every field with its placeholder.
pub fn schema_example() -> String {
    let body = InvoiceField::ALL
        .iter()
        .map(|f| format!("    \"{}\": \"{}\"", f.label(), f.placeholder()))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{}\n}}", body)
}

/// Build the user instruction embedding the extracted document text.
pub fn build_user_prompt(content: &str, buyer_hint: Option<&str>) -> String {
    let mut prompt = String::new();

    prompt.push_str("你是一个发票信息提取助手。请从下面的文本内容中提取结构化的发票信息，");
    prompt.push_str("发票票种通常为\"增值税电子普通发票\"或\"电子发票（普通发票）\"。\n\n");

    prompt.push_str("文件内容:\n---\n");
    prompt.push_str(content);
    prompt.push_str("\n---\n\n");

    prompt.push_str(&format!(
        "请严格按照以下JSON格式返回提取的信息，如果某个字段在文件中不存在，请用 \"{}\" 表示。\n",
        NOT_AVAILABLE
    ));
    prompt.push_str(&schema_example());
    prompt.push_str("\n\n");

    prompt.push_str("提取的例子：\n```csv\n");
    prompt.push_str(&InvoiceField::headers().join(","));
    prompt.push('\n');
    for row in EXAMPLE_ROWS {
        prompt.push_str(row);
        prompt.push('\n');
    }
    prompt.push_str("```\n\n");

    if let Some(hint) = buyer_hint {
        prompt.push_str("购买方名称及代码：\n");
        prompt.push_str(hint);
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "类别请在下面类目中匹配：\n[{}]\n\n",
        CATEGORIES.join(",")
    ));
    prompt.push_str("金额相关数值请不要带有货币符号，例如¥等。\n");
    prompt.push_str("注意不要搞反销售方和购买方信息。\n");

    prompt
}

/// Build the complete JSON-mode completion request.
pub fn build_request(
    model: &str,
    temperature: f32,
    content: &str,
    buyer_hint: Option<&str>,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(content, buyer_hint)),
        ],
        temperature,
        response_format: Some(ResponseFormat::json_object()),
    }
}
