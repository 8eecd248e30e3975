/*
Copyright (c) 2020 Todd Stellanova
LICENSE: BSD3 (see LICENSE file)
*/

//! Register tables: ordered (address, value) sequences that bring the sensor
//! into a capture mode. Entries are replayed in order; a later write to the
//! same address wins.

/// Upper bound on the length of any mode table, sizes [`RegisterTable`]
pub const MAX_REGISTER_TABLE_LEN: usize = 160;

/// How a table entry is interpreted when replayed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterKind {
    /// Write `value` to `address`
    Data,
    /// Wait `value` milliseconds; `address` is ignored
    Delay,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterEntry {
    pub kind: RegisterKind,
    pub address: u16,
    pub value: u16,
}

impl RegisterEntry {
    pub const fn data(address: u16, value: u16) -> Self {
        Self {
            kind: RegisterKind::Data,
            address,
            value,
        }
    }

    pub const fn delay(millis: u16) -> Self {
        Self {
            kind: RegisterKind::Delay,
            address: 0,
            value: millis,
        }
    }
}

/// Caller-owned, mutable copy of a mode table
pub type RegisterTable = heapless::Vec<RegisterEntry, MAX_REGISTER_TABLE_LEN>;

const fn data(address: u16, value: u16) -> RegisterEntry {
    RegisterEntry::data(address, value)
}

/// MCLK 24MHz, 3264x1836, 30fps, 4 lanes at 798Mbps/lane
pub const INIT_TAB_3264_1836_30FPS: &[RegisterEntry] = &[
    // external clock: 24MHz
    data(0x0136, 0x18),
    data(0x0137, 0x00),
    // global
    data(0x3051, 0x00),
    data(0x6b11, 0xcf),
    data(0x7ff0, 0x08),
    data(0x7ff1, 0x0f),
    data(0x7ff2, 0x08),
    data(0x7ff3, 0x1b),
    data(0x7ff4, 0x23),
    data(0x7ff5, 0x60),
    data(0x7ff6, 0x00),
    data(0x7ff7, 0x01),
    data(0x7ff8, 0x00),
    data(0x7ff9, 0x78),
    data(0x7ffa, 0x01),
    data(0x7ffb, 0x00),
    data(0x7ffc, 0x00),
    data(0x7ffd, 0x00),
    data(0x7ffe, 0x00),
    data(0x7fff, 0x03),
    data(0x7f76, 0x03),
    data(0x7f77, 0xfe),
    data(0x7fa8, 0x03),
    data(0x7fa9, 0xfe),
    data(0x7b24, 0x81),
    data(0x7b25, 0x01),
    data(0x6564, 0x07),
    data(0x6b0d, 0x41),
    data(0x653d, 0x04),
    data(0x6b05, 0x8c),
    data(0x6b06, 0xf9),
    data(0x6b08, 0x65),
    data(0x6b09, 0xfc),
    data(0x6b0a, 0xcf),
    data(0x6b0b, 0xd2),
    data(0x6700, 0x0e),
    data(0x6707, 0x0e),
    data(0x9104, 0x00),
    data(0x7421, 0x1c),
    data(0x7423, 0xd7),
    data(0x5f04, 0x00),
    data(0x5f05, 0xed),
    // output format: orientation, RAW10
    data(0x0101, 0x00),
    data(0x0112, 0x0a),
    data(0x0113, 0x0a),
    data(0x0114, 0x03),
    // PLL
    data(0x0301, 0x05),
    data(0x0303, 0x02),
    data(0x0305, 0x04),
    data(0x0306, 0x00),
    data(0x0307, 0x82),
    data(0x0309, 0x0a),
    data(0x030b, 0x01),
    data(0x030d, 0x02),
    data(0x030e, 0x00),
    data(0x030f, 0xd8),
    data(0x0310, 0x00),
    data(0x0820, 0x0c),
    data(0x0821, 0x30),
    data(0x0822, 0x00),
    data(0x0823, 0x00),
    // line length
    data(0x0342, 0x14), // HTS[15:8]
    data(0x0343, 0xe8), // HTS[7:0]
    // frame length
    data(0x0340, 0x07), // VTS[15:8]
    data(0x0341, 0x98), // VTS[7:0]
    // analog crop window
    data(0x0344, 0x00), // X_ADD_STA[12:8]
    data(0x0345, 0x00), // X_ADD_STA[7:0]
    data(0x0346, 0x02), // Y_ADD_STA[12:8]
    data(0x0347, 0x82), // Y_ADD_STA[7:0]
    data(0x0348, 0x10), // X_ADD_END[12:8]
    data(0x0349, 0x6f), // X_ADD_END[7:0]
    data(0x034a, 0x09), // Y_ADD_END[12:8]
    data(0x034b, 0xad), // Y_ADD_END[7:0]
    // subsampling / binning
    data(0x0381, 0x01), // X_EVN_INC
    data(0x0383, 0x01), // X_ODD_INC
    data(0x0385, 0x01), // Y_EVN_INC
    data(0x0387, 0x01), // Y_ODD_INC
    data(0x0900, 0x00), // BINNING_MODE
    data(0x0901, 0x11), // BINNING_TYPE_V
    // digital crop and scaler
    data(0x0401, 0x00), // SCALE_MODE[1:0]
    data(0x0404, 0x00), // SCALE_M[8]
    data(0x0405, 0x10), // SCALE_M[7:0]
    data(0x0408, 0x01), // DIG_CROP_X_OFFSET[12:8]
    data(0x0409, 0xd8), // DIG_CROP_X_OFFSET[7:0]
    data(0x040a, 0x00), // DIG_CROP_Y_OFFSET[11:8]
    data(0x040b, 0x00), // DIG_CROP_Y_OFFSET[7:0]
    data(0x040c, 0x0c), // DIG_CROP_IMAGE_WIDTH[12:8]
    data(0x040d, 0xc0), // DIG_CROP_IMAGE_WIDTH[7:0]
    data(0x040e, 0x07), // DIG_CROP_IMAGE_HEIGHT[11:8]
    data(0x040f, 0x2c), // DIG_CROP_IMAGE_HEIGHT[7:0]
    data(0x3038, 0x00), // SCALE_MODE_EXT
    data(0x303a, 0x00), // SCALE_M_EXT[8]
    data(0x303b, 0x10), // SCALE_M_EXT[7:0]
    data(0x300d, 0x00), // FORCE_FD_SUM
    // output size
    data(0x034c, 0x0c), // X_OUT_SIZE[12:8]
    data(0x034d, 0xc0), // X_OUT_SIZE[7:0]
    data(0x034e, 0x07), // Y_OUT_SIZE[11:8]
    data(0x034f, 0x2c), // Y_OUT_SIZE[7:0]
    // initial integration time
    data(0x0202, 0x07), // COARSE_INTEG_TIME[15:8]
    data(0x0203, 0x8e), // COARSE_INTEG_TIME[7:0]
    // initial analog and digital gain
    data(0x0204, 0x01), // ANA_GAIN_GLOBAL[8]
    data(0x0205, 0x00), // ANA_GAIN_GLOBAL[7:0]
    data(0x020e, 0x01), // DIG_GAIN_GR[15:8]
    data(0x020f, 0x00), // DIG_GAIN_GR[7:0]
    data(0x0210, 0x01), // DIG_GAIN_R[15:8]
    data(0x0211, 0x00), // DIG_GAIN_R[7:0]
    data(0x0212, 0x01), // DIG_GAIN_B[15:8]
    data(0x0213, 0x00), // DIG_GAIN_B[7:0]
    data(0x0214, 0x01), // DIG_GAIN_GB[15:8]
    data(0x0215, 0x00), // DIG_GAIN_GB[7:0]
    // AF
    data(0x7bcd, 0x00),
    // image quality
    data(0x94dc, 0x20),
    data(0x94dd, 0x20),
    data(0x94de, 0x20),
    data(0x95dc, 0x20),
    data(0x95dd, 0x20),
    data(0x95de, 0x20),
    data(0x7fb0, 0x00),
    data(0x9010, 0x3e),
    data(0x9419, 0x50),
    data(0x941b, 0x50),
    data(0x9519, 0x50),
    data(0x951b, 0x50),
    // misc mode
    data(0x3030, 0x00),
    data(0x3032, 0x00),
    data(0x0220, 0x00),
];

/// MCLK 24MHz, 3264x2448, 24fps, 4 lanes at 798Mbps/lane
pub const INIT_TAB_3264_2448_24FPS: &[RegisterEntry] = &[
    // external clock: 24MHz
    data(0x0136, 0x18),
    data(0x0137, 0x00),
    // global
    data(0x3051, 0x00),
    data(0x6b11, 0xcf),
    data(0x7ff0, 0x08),
    data(0x7ff1, 0x0f),
    data(0x7ff2, 0x08),
    data(0x7ff3, 0x1b),
    data(0x7ff4, 0x23),
    data(0x7ff5, 0x60),
    data(0x7ff6, 0x00),
    data(0x7ff7, 0x01),
    data(0x7ff8, 0x00),
    data(0x7ff9, 0x78),
    data(0x7ffa, 0x01),
    data(0x7ffb, 0x00),
    data(0x7ffc, 0x00),
    data(0x7ffd, 0x00),
    data(0x7ffe, 0x00),
    data(0x7fff, 0x03),
    data(0x7f76, 0x03),
    data(0x7f77, 0xfe),
    data(0x7fa8, 0x03),
    data(0x7fa9, 0xfe),
    data(0x7b24, 0x81),
    data(0x7b25, 0x01),
    data(0x6564, 0x07),
    data(0x6b0d, 0x41),
    data(0x653d, 0x04),
    data(0x6b05, 0x8c),
    data(0x6b06, 0xf9),
    data(0x6b08, 0x65),
    data(0x6b09, 0xfc),
    data(0x6b0a, 0xcf),
    data(0x6b0b, 0xd2),
    data(0x6700, 0x0e),
    data(0x6707, 0x0e),
    data(0x9104, 0x00),
    data(0x7421, 0x1c),
    data(0x7423, 0xd7),
    data(0x5f04, 0x00),
    data(0x5f05, 0xed),
    // output format: orientation, RAW10
    data(0x0101, 0x00),
    data(0x0112, 0x0a),
    data(0x0113, 0x0a),
    data(0x0114, 0x03),
    // PLL
    data(0x0301, 0x05),
    data(0x0303, 0x02),
    data(0x0305, 0x04),
    data(0x0306, 0x00),
    data(0x0307, 0x82),
    data(0x0309, 0x0a),
    data(0x030b, 0x01),
    data(0x030d, 0x02),
    data(0x030e, 0x00),
    data(0x030f, 0xd8),
    data(0x0310, 0x00),
    data(0x0820, 0x0c),
    data(0x0821, 0x30),
    data(0x0822, 0x00),
    data(0x0823, 0x00),
    // line length
    data(0x0342, 0x14), // HTS[15:8]
    data(0x0343, 0xe8), // HTS[7:0]
    // frame length
    data(0x0340, 0x09), // VTS[15:8]
    data(0x0341, 0xb0), // VTS[7:0]
    // analog crop window
    data(0x0344, 0x00), // X_ADD_STA[12:8]
    data(0x0345, 0x00), // X_ADD_STA[7:0]
    data(0x0346, 0x01), // Y_ADD_STA[12:8]
    data(0x0347, 0x50), // Y_ADD_STA[7:0]
    data(0x0348, 0x10), // X_ADD_END[12:8]
    data(0x0349, 0x6f), // X_ADD_END[7:0]
    data(0x034a, 0x0a), // Y_ADD_END[12:8]
    data(0x034b, 0xdf), // Y_ADD_END[7:0]
    // subsampling / binning
    data(0x0381, 0x01), // X_EVN_INC
    data(0x0383, 0x01), // X_ODD_INC
    data(0x0385, 0x01), // Y_EVN_INC
    data(0x0387, 0x01), // Y_ODD_INC
    data(0x0900, 0x00), // BINNING_MODE
    data(0x0901, 0x11), // BINNING_TYPE_V
    // digital crop and scaler
    data(0x0401, 0x00), // SCALE_MODE[1:0]
    data(0x0404, 0x00), // SCALE_M[8]
    data(0x0405, 0x10), // SCALE_M[7:0]
    data(0x0408, 0x01), // DIG_CROP_X_OFFSET[12:8]
    data(0x0409, 0xd8), // DIG_CROP_X_OFFSET[7:0]
    data(0x040a, 0x00), // DIG_CROP_Y_OFFSET[11:8]
    data(0x040b, 0x00), // DIG_CROP_Y_OFFSET[7:0]
    data(0x040c, 0x0c), // DIG_CROP_IMAGE_WIDTH[12:8]
    data(0x040d, 0xc0), // DIG_CROP_IMAGE_WIDTH[7:0]
    data(0x040e, 0x09), // DIG_CROP_IMAGE_HEIGHT[11:8]
    data(0x040f, 0x90), // DIG_CROP_IMAGE_HEIGHT[7:0]
    data(0x3038, 0x00), // SCALE_MODE_EXT
    data(0x303a, 0x00), // SCALE_M_EXT[8]
    data(0x303b, 0x10), // SCALE_M_EXT[7:0]
    data(0x300d, 0x00), // FORCE_FD_SUM
    // output size
    data(0x034c, 0x0c), // X_OUT_SIZE[12:8]
    data(0x034d, 0xc0), // X_OUT_SIZE[7:0]
    data(0x034e, 0x09), // Y_OUT_SIZE[11:8]
    data(0x034f, 0x90), // Y_OUT_SIZE[7:0]
    // initial integration time
    data(0x0202, 0x09), // COARSE_INTEG_TIME[15:8]
    data(0x0203, 0xa6), // COARSE_INTEG_TIME[7:0]
    // initial analog and digital gain
    data(0x0204, 0x01), // ANA_GAIN_GLOBAL[8]
    data(0x0205, 0x00), // ANA_GAIN_GLOBAL[7:0]
    data(0x020e, 0x01), // DIG_GAIN_GR[15:8]
    data(0x020f, 0x00), // DIG_GAIN_GR[7:0]
    data(0x0210, 0x01), // DIG_GAIN_R[15:8]
    data(0x0211, 0x00), // DIG_GAIN_R[7:0]
    data(0x0212, 0x01), // DIG_GAIN_B[15:8]
    data(0x0213, 0x00), // DIG_GAIN_B[7:0]
    data(0x0214, 0x01), // DIG_GAIN_GB[15:8]
    data(0x0215, 0x00), // DIG_GAIN_GB[7:0]
    // AF
    data(0x7bcd, 0x00),
    // image quality
    data(0x94dc, 0x20),
    data(0x94dd, 0x20),
    data(0x94de, 0x20),
    data(0x95dc, 0x20),
    data(0x95dd, 0x20),
    data(0x95de, 0x20),
    data(0x7fb0, 0x00),
    data(0x9010, 0x3e),
    data(0x9419, 0x50),
    data(0x941b, 0x50),
    data(0x9519, 0x50),
    data(0x951b, 0x50),
    // misc mode
    data(0x3030, 0x00),
    data(0x3032, 0x00),
    data(0x0220, 0x00),
];

const _: () = assert!(INIT_TAB_3264_1836_30FPS.len() <= MAX_REGISTER_TABLE_LEN);
const _: () = assert!(INIT_TAB_3264_2448_24FPS.len() <= MAX_REGISTER_TABLE_LEN);
