//! 支払い情報の入力整形
//!
//! 実際の決済処理は行わない。申請前に入力がそろっているかだけを確認する。

/// カード番号の最大桁数
const CARD_NUMBER_MAX_DIGITS: usize = 16;

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// カード番号を4桁区切りに整形する
///
/// 数字以外は除去し、先頭16桁までを使う。4桁未満の入力はそのまま返す。
pub fn format_card_number(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 4 {
        return digits;
    }

    let digits: Vec<char> = digits.chars().take(CARD_NUMBER_MAX_DIGITS).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 有効期限を MM/YY 形式に整形する
pub fn format_expiry(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 2 {
        return digits;
    }

    let month = &digits[..2];
    let year: String = digits.chars().skip(2).take(2).collect();
    format!("{}/{}", month, year)
}

/// CVVの数字のみを取り出す（4桁を超える場合は`None`）
pub fn sanitize_cvv(value: &str) -> Option<String> {
    let digits = digits_only(value);
    (digits.len() <= 4).then_some(digits)
}

/// 申請に添付される支払い情報
#[derive(Clone, Default)]
pub struct PaymentDetails {
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl PaymentDetails {
    /// 整形済みの値から支払い情報を組み立てる
    pub fn from_raw(card_number: &str, cardholder_name: &str, expiry: &str, cvv: &str) -> Self {
        Self {
            card_number: format_card_number(card_number),
            cardholder_name: cardholder_name.to_string(),
            expiry: format_expiry(&expiry.replace('/', "")),
            cvv: sanitize_cvv(cvv).unwrap_or_default(),
        }
    }

    /// 申請に必要な項目がすべてそろっているか
    ///
    /// - カード番号16桁以上
    /// - 名義（前後の空白を除いて）3文字以上
    /// - 有効期限が MM/YY の5文字
    /// - CVV 3桁以上
    pub fn is_complete(&self) -> bool {
        digits_only(&self.card_number).len() >= CARD_NUMBER_MAX_DIGITS
            && self.cardholder_name.trim().chars().count() >= 3
            && self.expiry.len() == 5
            && self.cvv.len() >= 3
    }
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"[REDACTED]")
            .field("cardholder_name", &self.cardholder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_card_number_groups_by_four() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111 1111x1111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("411111"), "4111 11");
    }

    #[test]
    fn test_format_card_number_truncates_to_sixteen_digits() {
        assert_eq!(
            format_card_number("41111111111111112222"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn test_format_card_number_keeps_short_input() {
        assert_eq!(format_card_number("41a"), "41");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("1227"), "12/27");
        assert_eq!(format_expiry("12 / 2799"), "12/27");
    }

    #[test]
    fn test_sanitize_cvv() {
        assert_eq!(sanitize_cvv("12a3"), Some("123".to_string()));
        assert_eq!(sanitize_cvv("12345"), None);
    }

    #[test]
    fn test_payment_details_complete() {
        let payment = PaymentDetails::from_raw("4111111111111111", "Jane Doe", "12/27", "123");
        assert!(payment.is_complete());
    }

    #[test]
    fn test_payment_details_incomplete() {
        let short_card = PaymentDetails::from_raw("411111111111", "Jane Doe", "12/27", "123");
        assert!(!short_card.is_complete());

        let short_name = PaymentDetails::from_raw("4111111111111111", " Jo ", "12/27", "123");
        assert!(!short_name.is_complete());

        let no_expiry = PaymentDetails::from_raw("4111111111111111", "Jane Doe", "12", "123");
        assert!(!no_expiry.is_complete());

        let long_cvv = PaymentDetails::from_raw("4111111111111111", "Jane Doe", "12/27", "12345");
        assert!(!long_cvv.is_complete());
    }

    #[test]
    fn test_payment_details_debug_redacts_secrets() {
        let payment = PaymentDetails::from_raw("4111111111111111", "Jane Doe", "12/27", "123");
        let debug = format!("{:?}", payment);
        assert!(!debug.contains("4111"));
        assert!(!debug.contains("123\""));
        assert!(debug.contains("Jane Doe"));
    }
}
