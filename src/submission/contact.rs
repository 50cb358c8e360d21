use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});

/// 从一段自由文本中拆出的联系方式
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: Option<String>,
}

/// 尽力而为地拆分 "姓名 + 邮箱"
///
/// 第一个匹配的邮箱被提取，其余文本去掉首尾空白后作为姓名。
pub fn split_contact(contact: &str) -> ContactInfo {
    match EMAIL_PATTERN.find(contact) {
        Some(found) => {
            let name = format!("{}{}", &contact[..found.start()], &contact[found.end()..]);
            ContactInfo {
                name: name.trim().trim_end_matches(',').trim().to_string(),
                email: Some(found.as_str().to_string()),
            }
        }
        None => ContactInfo {
            name: contact.trim().to_string(),
            email: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_email() {
        let info = split_contact("Ada Lovelace ada@example.org");
        assert_eq!(info.name, "Ada Lovelace");
        assert_eq!(info.email.as_deref(), Some("ada@example.org"));
    }

    #[test]
    fn test_email_first() {
        let info = split_contact("grace.hopper@navy.mil Grace");
        assert_eq!(info.name, "Grace");
        assert_eq!(info.email.as_deref(), Some("grace.hopper@navy.mil"));
    }

    #[test]
    fn test_no_email() {
        let info = split_contact("  just a name ");
        assert_eq!(info.name, "just a name");
        assert!(info.email.is_none());
    }
}
