mod output_test;
