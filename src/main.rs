use std::str::FromStr;

use clap::{Arg, Command};

use infilsim::logging::{init_logging, parse_log_level, LogConfig, LogOutput};
use infilsim::models::camera::Camera;
use infilsim::models::common::{Position2D, Rect};
use infilsim::models::concealment::{ConcealmentField, HidingSpot};
use infilsim::models::guard::Guard;
use infilsim::models::map::{Door, MissionMap};
use infilsim::models::operative::{AbilityKind, Operative};
use infilsim::scenario::MissionConfig;
use infilsim::simulation::MissionEngine;

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("infilsim")
        .version("0.1.0")
        .about("潜入戦術シミュレーション (Infiltration Simulation)")
        .long_about(
            "工作員チームの潜入ミッションを再現するエージェントベースの\n\
             時間駆動シミュレーションです。視覚検知・騒音・隠蔽・追跡の\n\
             挙動をヘッドレスで評価します。",
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help(
                    "実行するシナリオファイル(.yaml)のパスを指定します。\n\
                     指定しない場合、--demoで組み込みミッションを実行できます。",
                ),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
                .conflicts_with("test"),
        )
        .arg(
            Arg::new("demo")
                .short('d')
                .long("demo")
                .action(clap::ArgAction::SetTrue)
                .help("組み込みの標準ミッションで自動デモを実行")
                .conflicts_with("test"),
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(clap::ArgAction::SetTrue)
                .help("エージェントモデルのテストを実行")
                .conflicts_with("info"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)"),
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("DEST")
                .help("ログ出力先 (console, file, both)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)"),
        )
        .get_matches();

    println!("潜入戦術シミュレーション (Infiltration Simulation) - infilsim v0.1.0");
    println!();

    let verbose_level = matches.get_count("verbose");

    // ログシステムの初期化
    let mut log_config = LogConfig::default();
    if let Some(level) = matches.get_one::<String>("log-level") {
        log_config.level = parse_log_level(level);
    }
    if let Some(output) = matches.get_one::<String>("log-output") {
        match LogOutput::from_str(output) {
            Ok(parsed) => log_config.output = parsed,
            Err(message) => eprintln!("警告: {}", message),
        }
    }
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("エラー: ログ初期化に失敗しました: {}", e);
            std::process::exit(1);
        }
    };

    // テストモードの実行
    if matches.get_flag("test") {
        println!("=== エージェントモデルテストモード ===");
        test_agent_models();
        return;
    }

    if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        match run_scenario(scenario_path, matches.get_flag("info"), verbose_level) {
            Ok(_) => {
                if verbose_level > 0 {
                    println!("シナリオ実行が正常に完了しました。");
                }
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else if matches.get_flag("demo") {
        if let Err(e) = execute_mission(MissionConfig::default(), verbose_level) {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    } else {
        // デフォルト動作: 利用可能なシナリオ一覧を表示
        show_default_help();
    }
}

fn test_agent_models() {
    println!("\n=== エージェントモデルのテスト ===");

    // マップの作成
    let map = MissionMap::new(
        vec![Rect::new(160.0, 120.0, 240.0, 60.0)],
        vec![Door::new(1, Rect::new(400.0, 250.0, 30.0, 60.0), false)],
        Rect::new(980.0, 620.0, 90.0, 80.0),
    );
    println!(
        "ミッションマップが作成されました: 障害物{}件 / ドア{}箇所",
        map.obstacles.len(),
        map.doors.len()
    );

    // 隠蔽フィールドの作成
    let mut concealment =
        ConcealmentField::new(vec![HidingSpot::new(Position2D::new(110.0, 80.0), 38.0)]);
    concealment.spawn_smoke(Position2D::new(200.0, 200.0));
    println!(
        "隠蔽フィールドが作成されました: 隠れ場所{}箇所 / 煙幕{}個",
        concealment.hiding_spots.len(),
        concealment.smoke_clouds.len()
    );

    // 工作員の作成
    let operative = Operative::new(
        1,
        "Specter".to_string(),
        Position2D::new(80.0, 620.0),
        120.0,
        110.0,
        180.0,
        AbilityKind::SmokeScreen,
    );
    println!(
        "工作員が作成されました: {} ({})",
        operative.name,
        operative.ability.display_name()
    );

    // 歩哨の作成
    let guard = Guard::new(
        1,
        Position2D::new(320.0, 200.0),
        80.0,
        220.0,
        std::f64::consts::PI / 2.2,
        0.0,
        vec![
            Position2D::new(280.0, 200.0),
            Position2D::new(380.0, 200.0),
        ],
    );
    println!(
        "歩哨が作成されました: {} (巡回点: {})",
        guard.id,
        guard.patrol.len()
    );

    // 監視カメラの作成
    let camera = Camera::new(
        1,
        Position2D::new(640.0, 110.0),
        160.0,
        std::f64::consts::PI / 2.0,
        std::f64::consts::PI / 2.0,
    );
    println!("監視カメラが作成されました: {}", camera.id);

    println!("\n全てのエージェントモデルが正常に作成されました！");
}

/// シナリオファイルを読み込んで実行
fn run_scenario(
    scenario_path: &str,
    info_only: bool,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = MissionConfig::from_file(scenario_path)?;

    if verbose_level > 0 {
        println!("シナリオファイル読み込み完了: {}", scenario_path);
    }

    if info_only {
        config.print_summary();
        return Ok(());
    }

    execute_mission(config, verbose_level)?;

    Ok(())
}

/// ミッションの実行（自動デモ）
///
/// 全工作員を選択して脱出地点へ直行させ、勝敗確定または最大時間まで
/// シミュレーションを進めます。
fn execute_mission(config: MissionConfig, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    config.print_summary();
    println!();

    let mut engine = MissionEngine::new(config, verbose_level);
    engine.initialize()?;

    // 自動デモ: 全員選択で脱出地点の中心へ移動指示
    let positions: Vec<Position2D> = engine.operatives.iter().map(|op| op.position).collect();
    for position in positions {
        engine.select_at(position, true);
    }
    let destination = engine.map.extraction_zone.center();
    engine.issue_move(destination, false);

    engine.run()?;

    Ok(())
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  infilsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -d, --demo             組み込みミッションで自動デモを実行");
    println!("  -t, --test             エージェントモデルのテスト実行");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("      --log-output <DEST> ログ出力先 (console, file, both)");
    println!("      --log-level <LEVEL> ログレベル (trace〜error)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  missions/standard_infiltration.yaml - 標準ミッション");
    println!("  missions/training_ground.yaml       - 訓練場（警備なし）");
    println!();
    println!("例:");
    println!("  infilsim --demo");
    println!("  infilsim -s missions/standard_infiltration.yaml -v");
    println!("  infilsim -s missions/training_ground.yaml -i");
    println!("  infilsim --test");
}
