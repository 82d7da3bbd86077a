//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 单通道黑色. 二值掩码中的材料 (非气孔) 像素.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道白色. 二值掩码中的气孔像素.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 像素是否是黑色?
    #[inline]
    pub const fn is_black(p: u8) -> bool {
        matches!(p, BLACK)
    }

    /// 像素是否非黑色? 连通分量标记把所有非零像素都视为前景.
    #[inline]
    pub const fn is_lit(p: u8) -> bool {
        !is_black(p)
    }
}

/// 纵横比和离散度保留的小数位数.
pub const ROUND_DECIMALS: usize = 4;

/// 默认的二值化门限 (灰度值严格大于该值的像素为白色).
pub const DEFAULT_THRESHOLD: u8 = 127;

/// 默认的最小区域像素数. 像素数更少的连通分量被视为噪点而丢弃.
pub const DEFAULT_MIN_REGION: usize = 30;

/// 默认的开运算结构元素边长.
pub const DEFAULT_OPENING: usize = 15;

/// 连通分量标记中背景的标号.
pub const BACKGROUND_LABEL: usize = 0;
