//! プロセス全体の状態（OS の CWD・PWD）に触れるテスト

mod process_cwd_tests;
