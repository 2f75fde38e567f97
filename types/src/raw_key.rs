use crate::{serialize_32_byte_string, u256_struct};

u256_struct!(RawKey);
serialize_32_byte_string!(RawKey);
