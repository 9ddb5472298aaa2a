//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_asignatrack_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AsignaTrackError {
            $($variant(String),)*
        }

        impl AsignaTrackError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AsignaTrackError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AsignaTrackError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AsignaTrackError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AsignaTrackError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AsignaTrackError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_asignatrack_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    DataIntegrity("E013", "Data Integrity Error"),
}

impl AsignaTrackError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AsignaTrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AsignaTrackError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AsignaTrackError {
    fn from(err: sea_orm::DbErr) -> Self {
        AsignaTrackError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AsignaTrackError {
    fn from(err: std::io::Error) -> Self {
        AsignaTrackError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AsignaTrackError {
    fn from(err: serde_json::Error) -> Self {
        AsignaTrackError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AsignaTrackError {
    fn from(err: chrono::ParseError) -> Self {
        AsignaTrackError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AsignaTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AsignaTrackError::cache_connection("test").code(), "E001");
        assert_eq!(AsignaTrackError::database_config("test").code(), "E003");
        assert_eq!(AsignaTrackError::validation("test").code(), "E007");
        assert_eq!(AsignaTrackError::data_integrity("test").code(), "E013");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AsignaTrackError::validation("test").error_type(),
            "Validation Error"
        );
        assert_eq!(
            AsignaTrackError::data_integrity("test").error_type(),
            "Data Integrity Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = AsignaTrackError::validation("closeDate anterior a dueDate");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("closeDate anterior a dueDate"));
    }
}
