//! 目录身份格式化
//!
//! 把用户输入的点分域名和绑定用户名转换成目录服务需要的两种编码：
//! `DC=` 形式的可分辨名称组件，以及按目录类型拼接的绑定身份。
//!
//! `format_*` 系列函数是纯函数，永不失败：表单字段是自由文本，
//! 格式错误的输入只会得到尽力而为的字符串。需要严格语法时使用 [`DomainName`]。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// LDAP 默认端口
pub const DEFAULT_LDAP_PORT: u16 = 389;

const DC_PREFIX: &str = "DC=";
const MAX_LABEL_LEN: usize = 63;

/// 目录服务实现类型，只影响绑定身份的格式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum DirectoryFlavor {
    /// Microsoft AD DC
    #[default]
    #[serde(rename = "ms")]
    Microsoft,
    /// Samba AD DC
    #[serde(rename = "samba")]
    Samba,
}

impl DirectoryFlavor {
    /// 解析类型标识：只有 `"samba"` 被识别，其它一律视为 Microsoft。
    pub fn from_discriminator(value: &str) -> Self {
        if value == "samba" {
            Self::Samba
        } else {
            Self::Microsoft
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Microsoft => "ms",
            Self::Samba => "samba",
        }
    }
}

impl From<String> for DirectoryFlavor {
    fn from(value: String) -> Self {
        Self::from_discriminator(&value)
    }
}

impl FromStr for DirectoryFlavor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_discriminator(s))
    }
}

impl fmt::Display for DirectoryFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `example.local` → `DC=example,DC=local`
///
/// 每个以 `.` 分隔的片段都会生成一个 `DC=` 组件（包括空片段），
/// 片段内容原样保留，不做字符校验。空输入返回空字符串。
pub fn format_domain_component(dotted: &str) -> String {
    if dotted.is_empty() {
        return String::new();
    }

    dotted
        .split('.')
        .map(|part| format!("{DC_PREFIX}{part}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// 按目录类型拼接绑定身份。
///
/// `dotted` 是格式化之前的点分域名，而不是 `DC=` 字符串。
/// 用户名或域名为空时原样返回用户名。
pub fn format_ldap_user(username: &str, dotted: &str, flavor: DirectoryFlavor) -> String {
    if username.is_empty() || dotted.is_empty() {
        return username.to_string();
    }

    match flavor {
        DirectoryFlavor::Samba => format!("{username}@{}", dotted.to_uppercase()),
        DirectoryFlavor::Microsoft => format!(
            "CN={username},CN=Users,{}",
            format_domain_component(dotted)
        ),
    }
}

/// 未启用自定义端口时使用 389。
pub fn resolve_port(custom_port: Option<u16>) -> u16 {
    custom_port.unwrap_or(DEFAULT_LDAP_PORT)
}

/// 编辑界面使用的有损逆转换：去掉 `DC=` 并把 `,` 换成 `.`。
///
/// 如果某个标签本身含有逗号或 `DC=`，结果与原始输入不同。
pub fn unformat_domain_component(component: &str) -> String {
    component.replace(DC_PREFIX, "").replace(',', ".")
}

/// 从已拼接的绑定身份中取回原始用户名。
///
/// 格式不匹配时原样返回。
pub fn extract_bind_username(ldap_user: &str, flavor: DirectoryFlavor) -> String {
    match flavor {
        DirectoryFlavor::Samba => match ldap_user.split_once('@') {
            Some((username, _)) => username.to_string(),
            None => ldap_user.to_string(),
        },
        DirectoryFlavor::Microsoft => {
            let Some(rest) = ldap_user.strip_prefix("CN=") else {
                return ldap_user.to_string();
            };
            match rest.split(',').next() {
                Some(username) if !username.is_empty() => username.to_string(),
                _ => ldap_user.to_string(),
            }
        }
    }
}

/// 经过严格语法校验的点分域名。
///
/// 标签只允许 ASCII 字母、数字和连字符，长度 1..=63，且不能以连字符开头或结尾。
/// 在这个语法下 `DC=` 编码是可精确逆转的。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(value: impl AsRef<str>) -> DomainResult<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(DomainError::invalid_domain_name(value, "域名不能为空"));
        }

        for label in value.split('.') {
            validate_label(value, label)?;
        }

        Ok(Self(value.to_string()))
    }

    /// `DC=example,DC=local` → `example.local`，每个组件都必须是 `DC=<label>`。
    pub fn from_domain_component(component: &str) -> DomainResult<Self> {
        if component.trim().is_empty() {
            return Err(DomainError::invalid_domain_name(component, "组件不能为空"));
        }

        let mut labels = Vec::new();
        for part in component.split(',') {
            let part = part.trim();
            let label = part
                .get(..DC_PREFIX.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(DC_PREFIX))
                .map(|_| &part[DC_PREFIX.len()..])
                .ok_or_else(|| {
                    DomainError::invalid_domain_name(component, format!("{part:?} 不是 DC= 组件"))
                })?;
            validate_label(component, label)?;
            labels.push(label);
        }

        Ok(Self(labels.join(".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn to_domain_component(&self) -> String {
        format_domain_component(&self.0)
    }

    pub fn bind_identity(&self, username: &str, flavor: DirectoryFlavor) -> String {
        format_ldap_user(username, &self.0, flavor)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_label(name: &str, label: &str) -> DomainResult<()> {
    if label.is_empty() {
        return Err(DomainError::invalid_domain_name(name, "存在空标签"));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(DomainError::invalid_domain_name(
            name,
            format!("标签 {label:?} 超过63个字符"),
        ));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(DomainError::invalid_domain_name(
            name,
            format!("标签 {label:?} 不能以连字符开头或结尾"),
        ));
    }
    if let Some(c) = label.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(DomainError::invalid_domain_name(
            name,
            format!("标签 {label:?} 包含非法字符 {c:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_domain_component() {
        assert_eq!(format_domain_component(""), "");
        assert_eq!(format_domain_component("a"), "DC=a");
        assert_eq!(format_domain_component("a.b.c"), "DC=a,DC=b,DC=c");
        assert_eq!(
            format_domain_component("odieproje.local"),
            "DC=odieproje,DC=local"
        );
    }

    #[test]
    fn test_component_count_matches_dots() {
        for name in ["a", "a.b", "corp.acme.com", "x.y.z.w", "a..b", "trailing.", "we ird.na,me"] {
            let formatted = format_domain_component(name);
            let dots = name.matches('.').count();
            assert_eq!(formatted.matches("DC=").count(), dots + 1, "name: {name}");
        }
    }

    #[test]
    fn test_segments_are_not_validated() {
        assert_eq!(format_domain_component("ü ber.x"), "DC=ü ber,DC=x");
    }

    #[test]
    fn test_format_ldap_user_microsoft() {
        assert_eq!(
            format_ldap_user("Administrator", "example.local", DirectoryFlavor::Microsoft),
            "CN=Administrator,CN=Users,DC=example,DC=local"
        );
    }

    #[test]
    fn test_format_ldap_user_samba() {
        assert_eq!(
            format_ldap_user("Administrator", "example.local", DirectoryFlavor::Samba),
            "Administrator@EXAMPLE.LOCAL"
        );
    }

    #[test]
    fn test_format_ldap_user_passes_through_on_missing_fields() {
        assert_eq!(format_ldap_user("bob", "", DirectoryFlavor::Microsoft), "bob");
        assert_eq!(format_ldap_user("", "example.local", DirectoryFlavor::Samba), "");
    }

    #[test]
    fn test_format_ldap_user_is_deterministic() {
        let first = format_ldap_user("alice", "corp.local", DirectoryFlavor::Microsoft);
        let second = format_ldap_user("alice", "corp.local", DirectoryFlavor::Microsoft);
        assert_eq!(first, second);
    }

    #[test]
    fn test_flavor_discriminator() {
        assert_eq!(DirectoryFlavor::from_discriminator("samba"), DirectoryFlavor::Samba);
        assert_eq!(DirectoryFlavor::from_discriminator("ms"), DirectoryFlavor::Microsoft);
        assert_eq!(DirectoryFlavor::from_discriminator("Samba"), DirectoryFlavor::Microsoft);
        assert_eq!(DirectoryFlavor::from_discriminator(""), DirectoryFlavor::Microsoft);

        let flavor: DirectoryFlavor = serde_json::from_str("\"openldap\"").unwrap();
        assert_eq!(flavor, DirectoryFlavor::Microsoft);
        assert_eq!(serde_json::to_string(&DirectoryFlavor::Samba).unwrap(), "\"samba\"");
    }

    #[test]
    fn test_resolve_port() {
        assert_eq!(resolve_port(None), 389);
        assert_eq!(resolve_port(Some(636)), 636);
    }

    #[test]
    fn test_lossy_inverse() {
        assert_eq!(
            unformat_domain_component("DC=odieproje,DC=local"),
            "odieproje.local"
        );
        // 标签里的逗号无法还原
        assert_eq!(
            unformat_domain_component(&format_domain_component("a,b.c")),
            "a.b.c"
        );
    }

    #[test]
    fn test_extract_bind_username() {
        assert_eq!(
            extract_bind_username("Administrator@EXAMPLE.LOCAL", DirectoryFlavor::Samba),
            "Administrator"
        );
        assert_eq!(
            extract_bind_username(
                "CN=Administrator,CN=Users,DC=example,DC=local",
                DirectoryFlavor::Microsoft
            ),
            "Administrator"
        );
        assert_eq!(extract_bind_username("plain", DirectoryFlavor::Microsoft), "plain");
        assert_eq!(extract_bind_username("plain", DirectoryFlavor::Samba), "plain");
    }

    #[test]
    fn test_domain_name_grammar() {
        assert!(DomainName::parse("corp-1.example.local").is_ok());
        assert!(DomainName::parse("").is_err());
        assert!(DomainName::parse("a..b").is_err());
        assert!(DomainName::parse("a,b.c").is_err());
        assert!(DomainName::parse("-a.b").is_err());
        assert!(DomainName::parse("under_score.local").is_err());
        assert!(DomainName::parse(format!("{}.local", "a".repeat(64))).is_err());
    }

    #[test]
    fn test_domain_name_round_trip() {
        let name = DomainName::parse("odieproje.local").unwrap();
        let component = name.to_domain_component();
        assert_eq!(component, "DC=odieproje,DC=local");
        assert_eq!(DomainName::from_domain_component(&component).unwrap(), name);
        assert_eq!(
            DomainName::from_domain_component("dc=a, DC=b").unwrap().as_str(),
            "a.b"
        );
    }

    #[test]
    fn test_domain_component_with_foreign_parts_is_rejected() {
        assert!(DomainName::from_domain_component("CN=Users,DC=a").is_err());
        assert!(DomainName::from_domain_component("DC=a,,DC=b").is_err());
        assert!(DomainName::from_domain_component("").is_err());
    }

    #[test]
    fn test_domain_name_bind_identity() {
        let name = DomainName::parse("example.local").unwrap();
        assert_eq!(
            name.bind_identity("bob", DirectoryFlavor::Samba),
            "bob@EXAMPLE.LOCAL"
        );
        assert_eq!(name.labels().collect::<Vec<_>>(), vec!["example", "local"]);
    }
}
