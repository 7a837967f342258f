use std::fmt;

#[derive(Debug, Clone)]
pub enum SharelinkerError {
    Unauthenticated(String),
    Internal(String),
    InvalidArgument(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    BatchLimitExceeded(String),
    Serialization(String),
}

impl SharelinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SharelinkerError::Unauthenticated(_) => "E001",
            SharelinkerError::Internal(_) => "E002",
            SharelinkerError::InvalidArgument(_) => "E003",
            SharelinkerError::DatabaseConfig(_) => "E004",
            SharelinkerError::DatabaseConnection(_) => "E005",
            SharelinkerError::DatabaseOperation(_) => "E006",
            SharelinkerError::BatchLimitExceeded(_) => "E007",
            SharelinkerError::Serialization(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SharelinkerError::Unauthenticated(_) => "Unauthenticated",
            SharelinkerError::Internal(_) => "Internal Error",
            SharelinkerError::InvalidArgument(_) => "Invalid Argument",
            SharelinkerError::DatabaseConfig(_) => "Database Configuration Error",
            SharelinkerError::DatabaseConnection(_) => "Database Connection Error",
            SharelinkerError::DatabaseOperation(_) => "Database Operation Error",
            SharelinkerError::BatchLimitExceeded(_) => "Batch Limit Exceeded",
            SharelinkerError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SharelinkerError::Unauthenticated(msg)
            | SharelinkerError::Internal(msg)
            | SharelinkerError::InvalidArgument(msg)
            | SharelinkerError::DatabaseConfig(msg)
            | SharelinkerError::DatabaseConnection(msg)
            | SharelinkerError::DatabaseOperation(msg)
            | SharelinkerError::BatchLimitExceeded(msg)
            | SharelinkerError::Serialization(msg) => msg,
        }
    }

    /// 是否可以原样返回给调用方
    ///
    /// 业务端点只向调用方暴露 Unauthenticated 和 Internal，
    /// InvalidArgument 仅用于请求体无法解析的情况，由 HTTP 层直接返回。
    pub fn is_caller_visible(&self) -> bool {
        matches!(
            self,
            SharelinkerError::Unauthenticated(_) | SharelinkerError::Internal(_)
        )
    }

    /// 转换为调用方可见的错误：Unauthenticated 原样返回，其余替换为 `Internal(public_message)`
    pub fn into_caller_error(self, public_message: &str) -> Self {
        match self {
            SharelinkerError::Unauthenticated(_) => self,
            _ => SharelinkerError::Internal(public_message.to_string()),
        }
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SharelinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SharelinkerError {}

// 便捷的构造函数
impl SharelinkerError {
    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::Unauthenticated(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::Internal(msg.into())
    }

    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::InvalidArgument(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::DatabaseOperation(msg.into())
    }

    pub fn batch_limit_exceeded<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::BatchLimitExceeded(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SharelinkerError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SharelinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        SharelinkerError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SharelinkerError {
    fn from(err: serde_json::Error) -> Self {
        SharelinkerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SharelinkerError>;
