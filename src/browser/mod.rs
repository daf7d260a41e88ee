//! 浏览器会话
//!
//! 两种方式拿到 Page：连接已登录的浏览器（默认），或自行启动一个

pub mod connection;
pub mod launch;

pub use connection::connect_to_browser_and_page;
pub use launch::launch_browser;
