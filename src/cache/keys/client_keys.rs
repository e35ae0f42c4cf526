/// 客户端 IP 限流键前缀
const CLIENT_IP_PREFIX: &str = "ip:";

/// 外部传入的缓存键和限流键的最大长度（字节）
pub const MAX_KEY_LEN: usize = 256;

/// 生成客户端 IP 限流键
pub fn client_ip_key(ip: &str) -> String {
    format!("{}{}", CLIENT_IP_PREFIX, ip)
}

pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= MAX_KEY_LEN
}
