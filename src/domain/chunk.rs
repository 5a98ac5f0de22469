/// ドメイン層: チャンク分割
///
/// ファイルを固定サイズのバイト範囲に分割する。
/// 各範囲は `[start, end)` で、最後のチャンクはファイルサイズで切り詰められる。
use serde::Serialize;

/// 1チャンク分のバイト範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    /// 1始まりの連番
    pub chunk_number: u64,
    /// 開始オフセット（含む）
    pub start: u64,
    /// 終了オフセット（含まない）
    pub end: u64,
}

impl ChunkSpec {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// アップロード済みチャンクの記録
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedChunk {
    pub chunk_number: u64,
    pub size: u64,
    /// サーバーの応答ボディ
    pub response: serde_json::Value,
}

/// チャンク総数 `ceil(file_size / chunk_size)`
///
/// `chunk_size` は 1 以上であること（UploadOptions の検証で保証される）。
pub fn total_chunks(file_size: u64, chunk_size: u64) -> u64 {
    file_size.div_ceil(chunk_size)
}

/// ファイル全体を覆うチャンク範囲の一覧を作成
pub fn plan_chunks(file_size: u64, chunk_size: u64) -> Vec<ChunkSpec> {
    (0..total_chunks(file_size, chunk_size))
        .map(|index| {
            let start = index * chunk_size;
            ChunkSpec {
                chunk_number: index + 1,
                start,
                end: (start + chunk_size).min(file_size),
            }
        })
        .collect()
}

/// 記録をチャンク番号順に並べ、番号の一覧を返す
pub fn sorted_chunk_numbers(uploaded: &mut [UploadedChunk]) -> Vec<u64> {
    uploaded.sort_by_key(|chunk| chunk.chunk_number);
    uploaded.iter().map(|chunk| chunk.chunk_number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(file_size: u64, chunk_size: u64) {
        let plan = plan_chunks(file_size, chunk_size);
        assert_eq!(plan.len() as u64, total_chunks(file_size, chunk_size));

        let mut expected_start = 0;
        for (index, chunk) in plan.iter().enumerate() {
            assert_eq!(chunk.chunk_number, index as u64 + 1);
            assert_eq!(chunk.start, expected_start, "gap or overlap before chunk {}", chunk.chunk_number);
            assert!(!chunk.is_empty());
            assert!(chunk.len() <= chunk_size);
            expected_start = chunk.end;
        }
        assert_eq!(expected_start, file_size);
    }

    #[test]
    fn test_total_chunks_rounds_up() {
        assert_eq!(total_chunks(0, 4), 0);
        assert_eq!(total_chunks(1, 4), 1);
        assert_eq!(total_chunks(4, 4), 1);
        assert_eq!(total_chunks(5, 4), 2);
        assert_eq!(total_chunks(5 * 1_048_576, 1_048_576), 5);
    }

    #[test]
    fn test_plan_covers_file_exactly() {
        for (file_size, chunk_size) in [(10, 4), (12, 4), (1, 1), (7, 100), (1_048_577, 1_048_576)] {
            assert_exact_cover(file_size, chunk_size);
        }
    }

    #[test]
    fn test_last_chunk_is_clamped() {
        let plan = plan_chunks(10, 4);
        assert_eq!(
            plan,
            vec![
                ChunkSpec { chunk_number: 1, start: 0, end: 4 },
                ChunkSpec { chunk_number: 2, start: 4, end: 8 },
                ChunkSpec { chunk_number: 3, start: 8, end: 10 },
            ]
        );
    }

    #[test]
    fn test_empty_file_has_no_chunks() {
        assert!(plan_chunks(0, 1024).is_empty());
    }

    #[test]
    fn test_sorted_chunk_numbers() {
        let record = |n| UploadedChunk {
            chunk_number: n,
            size: 1,
            response: serde_json::Value::Null,
        };
        let mut uploaded = vec![record(3), record(1), record(2)];

        assert_eq!(sorted_chunk_numbers(&mut uploaded), vec![1, 2, 3]);
        assert_eq!(uploaded[0].chunk_number, 1);
    }
}
