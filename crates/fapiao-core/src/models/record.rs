//! The fixed-schema invoice record produced for every document.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Placeholder for any value the model did not or could not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// One of the 15 fields extracted from a fapiao (Chinese tax invoice).
///
/// The declaration order is the column order of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceField {
    /// 发票代码 - invoice code (absent on fully digital invoices).
    InvoiceCode,
    /// 发票号码 - invoice number.
    InvoiceNumber,
    /// 销方识别号 - seller taxpayer id.
    SellerTaxId,
    /// 销方名称 - seller name.
    SellerName,
    /// 购方识别号 - buyer taxpayer id.
    BuyerTaxId,
    /// 购买方名称 - buyer name.
    BuyerName,
    /// 开票日期 - issue date.
    IssueDate,
    /// 项目名称 - item name.
    ItemName,
    /// 数量 - quantity.
    Quantity,
    /// 金额 - amount before tax.
    Amount,
    /// 税率 - tax rate.
    TaxRate,
    /// 税额 - tax amount.
    TaxAmount,
    /// 价税合计 - total including tax.
    TotalAmount,
    /// 发票票种 - invoice type.
    InvoiceType,
    /// 类别 - spending category.
    Category,
}

impl InvoiceField {
    /// Number of fields in the schema.
    pub const COUNT: usize = 15;

    /// All fields in report column order.
    pub const ALL: [InvoiceField; Self::COUNT] = [
        InvoiceField::InvoiceCode,
        InvoiceField::InvoiceNumber,
        InvoiceField::SellerTaxId,
        InvoiceField::SellerName,
        InvoiceField::BuyerTaxId,
        InvoiceField::BuyerName,
        InvoiceField::IssueDate,
        InvoiceField::ItemName,
        InvoiceField::Quantity,
        InvoiceField::Amount,
        InvoiceField::TaxRate,
        InvoiceField::TaxAmount,
        InvoiceField::TotalAmount,
        InvoiceField::InvoiceType,
        InvoiceField::Category,
    ];

    /// The label used as JSON key in model output and as CSV column header.
    pub fn label(self) -> &'static str {
        match self {
            InvoiceField::InvoiceCode => "发票代码",
            InvoiceField::InvoiceNumber => "发票号码",
            InvoiceField::SellerTaxId => "销方识别号",
            InvoiceField::SellerName => "销方名称",
            InvoiceField::BuyerTaxId => "购方识别号",
            InvoiceField::BuyerName => "购买方名称",
            InvoiceField::IssueDate => "开票日期",
            InvoiceField::ItemName => "项目名称",
            InvoiceField::Quantity => "数量",
            InvoiceField::Amount => "金额",
            InvoiceField::TaxRate => "税率",
            InvoiceField::TaxAmount => "税额",
            InvoiceField::TotalAmount => "价税合计",
            InvoiceField::InvoiceType => "发票票种",
            InvoiceField::Category => "类别",
        }
    }

    /// English placeholder shown to the model in the schema example.
    pub fn placeholder(self) -> &'static str {
        match self {
            InvoiceField::InvoiceCode => "invoice_code",
            InvoiceField::InvoiceNumber => "invoice_number",
            InvoiceField::SellerTaxId => "seller_tax_id",
            InvoiceField::SellerName => "seller_name",
            InvoiceField::BuyerTaxId => "buyer_tax_id",
            InvoiceField::BuyerName => "buyer_name",
            InvoiceField::IssueDate => "issue_date",
            InvoiceField::ItemName => "item_name",
            InvoiceField::Quantity => "quantity",
            InvoiceField::Amount => "amount",
            InvoiceField::TaxRate => "tax_rate",
            InvoiceField::TaxAmount => "tax_amount",
            InvoiceField::TotalAmount => "total_amount",
            InvoiceField::InvoiceType => "invoice_type",
            InvoiceField::Category => "category",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Report header row.
    pub fn headers() -> [&'static str; Self::COUNT] {
        Self::ALL.map(InvoiceField::label)
    }
}

/// A complete invoice record: every field always holds a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    values: [String; InvoiceField::COUNT],
}

impl InvoiceRecord {
    /// The failure sentinel: every field is "N/A".
    pub fn unavailable() -> Self {
        Self {
            values: std::array::from_fn(|_| NOT_AVAILABLE.to_string()),
        }
    }

    /// Build a record from a parsed model object.
    ///
    /// Keys outside the schema are ignored; missing keys and `null` become
    /// "N/A". Strings are copied verbatim, other JSON values keep their
    /// JSON text.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut record = Self::unavailable();
        for field in InvoiceField::ALL {
            if let Some(value) = object.get(field.label()).and_then(value_to_text) {
                record.set(field, value);
            }
        }
        record
    }

    pub fn get(&self, field: InvoiceField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: InvoiceField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Values in report column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// (field, value) pairs in report column order.
    pub fn iter(&self) -> impl Iterator<Item = (InvoiceField, &str)> {
        InvoiceField::ALL.into_iter().zip(self.values())
    }
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl Serialize for InvoiceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(InvoiceField::COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.label(), value)?;
        }
        map.end()
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Result of driving one document through extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// The record to report (the sentinel on failure).
    pub record: InvoiceRecord,
    /// Whether the record came from a parsed model answer.
    pub extracted: bool,
}

impl ExtractionOutcome {
    pub fn success(record: InvoiceRecord) -> Self {
        Self {
            record,
            extracted: true,
        }
    }

    pub fn failure() -> Self {
        Self {
            record: InvoiceRecord::unavailable(),
            extracted: false,
        }
    }
}
