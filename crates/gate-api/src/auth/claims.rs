//! 토큰 페이로드 타입.
//!
//! [`Identity`]는 로그인 시 사용자 저장소에서 만들어진 신원 정보이고,
//! [`Claims`]는 여기에 발급/만료 시각을 붙여 서명된 토큰에 담기는 형태입니다.

use serde::{Deserialize, Serialize};

/// 계정 유형.
///
/// 토큰에는 정수(`0`, `1`, `2`)로 직렬화됩니다. 알 수 없는 값은 디코딩 단계에서 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountType {
    /// 일반 소매 고객
    Retail = 0,
    /// 도매 거래처
    Wholesale = 1,
    /// 매장 직원
    Staff = 2,
}

impl TryFrom<u8> for AccountType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountType::Retail),
            1 => Ok(AccountType::Wholesale),
            2 => Ok(AccountType::Staff),
            other => Err(format!("unknown account type: {}", other)),
        }
    }
}

impl From<AccountType> for u8 {
    fn from(value: AccountType) -> Self {
        value as u8
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AccountType::Retail => "retail",
            AccountType::Wholesale => "wholesale",
            AccountType::Staff => "staff",
        };
        write!(f, "{}", s)
    }
}

/// 인증된 사용자의 신원 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Subject - 사용자 ID
    #[serde(rename = "sub")]
    pub user_id: i64,
    /// 표시 이름
    pub name: String,
    /// 매장(테넌트) 코드 - 데이터 접근 범위
    pub store_code: String,
    /// 관리자 여부
    pub is_admin: bool,
    /// 계정 유형
    pub account_type: AccountType,
    /// 적용 가격표 ID
    pub price_list_id: Option<i64>,
}

/// 토큰 페이로드.
///
/// `iat`/`exp`는 코덱이 발급 시점에 설정하며 호출자가 지정하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 신원 정보
    #[serde(flatten)]
    pub identity: Identity,
    /// Issued At - 발급 시각 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 만료 시각 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 사용자 ID.
    pub fn user_id(&self) -> i64 {
        self.identity.user_id
    }

    /// 매장 코드.
    pub fn store_code(&self) -> &str {
        &self.identity.store_code
    }

    /// 관리자 여부.
    pub fn is_admin(&self) -> bool {
        self.identity.is_admin
    }
}
