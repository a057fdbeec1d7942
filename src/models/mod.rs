mod link;

pub use link::{
    BulkResultDto, BulkShortenResponseDto, LinkRecord, ShortLink, ShortenRequestDto,
    ShortenResponseDto,
};
